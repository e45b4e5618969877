use std::fs;
use std::path::Path;
use tempfile::tempdir;

use nastape_cli::commands::splice;
use nastape_core::{constants::PILOT_LEN, encoder::encode_tape, scanner::read_blocks};

const BLOCK: usize = 277;

/// Helper: a clean 4-block tape
fn create_tape() -> (Vec<u8>, Vec<u8>) {
    let program: Vec<u8> = (0..1024u32).map(|i| (i * 3 % 251) as u8 + 1).collect();
    let tape = encode_tape(0x1000, &program).unwrap().to_vec();
    (program, tape)
}

fn write(dir: &Path, name: &str, data: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn splice_front_and_back_captures() {
    let td = tempdir().unwrap();
    let (program, tape) = create_tape();

    // Dropout inside block 1 (the third block on tape)
    let mut front = tape.clone();
    front[PILOT_LEN + 2 * BLOCK + 30] ^= 0x20;

    // Started late, inside block 2; holds blocks 1 and 0
    let mut back = b"motor".to_vec();
    back.extend_from_slice(&tape[PILOT_LEN + BLOCK + 100..]);

    let inputs = vec![
        write(td.path(), "front.cas", &front),
        write(td.path(), "back.cas", &back),
    ];
    let out_path = td.path().join("merged.cas");

    let outcome = splice::execute(&inputs, out_path.to_str().unwrap()).unwrap();

    assert_eq!(outcome.blocks_written, 4);
    assert!(outcome.complete);

    let merged = fs::read(&out_path).unwrap();
    assert_eq!(merged, tape);

    let recovered: Vec<u8> = read_blocks(&merged)
        .into_blocks()
        .iter()
        .flat_map(|b| b.data().to_vec())
        .collect();
    assert_eq!(recovered, program);
}

#[test]
fn splice_skips_capture_without_pilot_first() {
    let td = tempdir().unwrap();
    let (_, tape) = create_tape();

    let inputs = vec![
        write(td.path(), "late.cas", &tape[PILOT_LEN + BLOCK..]),
        write(td.path(), "full.cas", &tape),
    ];
    let out_path = td.path().join("merged.cas");

    let outcome = splice::execute(&inputs, out_path.to_str().unwrap()).unwrap();

    assert_eq!(outcome.blocks_written, 4);
    assert!(outcome.complete);
    assert_eq!(fs::read(&out_path).unwrap(), tape);
}

#[test]
fn splice_stops_once_complete() {
    let td = tempdir().unwrap();
    let (_, tape) = create_tape();

    let inputs = vec![
        write(td.path(), "a.cas", &tape),
        write(td.path(), "b.cas", &tape),
    ];
    let out_path = td.path().join("merged.cas");

    let outcome = splice::execute(&inputs, out_path.to_str().unwrap()).unwrap();

    assert_eq!(outcome.blocks_written, 4);
    assert_eq!(fs::read(&out_path).unwrap(), tape);
}

#[test]
fn splice_still_missing_end() {
    let td = tempdir().unwrap();
    let (_, tape) = create_tape();

    let inputs = vec![write(td.path(), "front.cas", &tape[..PILOT_LEN + 2 * BLOCK + 10])];
    let out_path = td.path().join("merged.cas");

    let outcome = splice::execute(&inputs, out_path.to_str().unwrap()).unwrap();

    assert_eq!(outcome.blocks_written, 2);
    assert_eq!(outcome.last_block_no, Some(2));
    assert!(!outcome.complete);
}

#[test]
fn splice_without_beginning_fails() {
    let td = tempdir().unwrap();
    let (_, tape) = create_tape();

    let inputs = vec![write(td.path(), "late.cas", &tape[PILOT_LEN + BLOCK..])];
    let out_path = td.path().join("merged.cas");

    let result = splice::execute(&inputs, out_path.to_str().unwrap());

    assert!(result.is_err());
    assert!(!out_path.exists());
}

#[test]
fn splice_back_capture_with_own_lead_in() {
    let td = tempdir().unwrap();
    let (program, tape) = create_tape();

    let front = &tape[..PILOT_LEN + 2 * BLOCK];

    // Motor started early: a full run of zeros ahead of block 1
    let mut back = vec![0u8; PILOT_LEN];
    back.extend_from_slice(&tape[PILOT_LEN + 2 * BLOCK..]);

    let inputs = vec![
        write(td.path(), "front.cas", front),
        write(td.path(), "back.cas", &back),
    ];
    let out_path = td.path().join("merged.cas");

    let outcome = splice::execute(&inputs, out_path.to_str().unwrap()).unwrap();

    assert_eq!(outcome.blocks_written, 4);
    assert!(outcome.complete);
    assert_eq!(outcome.address_breaks, 0);

    let merged = fs::read(&out_path).unwrap();
    assert_eq!(merged.len(), tape.len());
    assert_eq!(merged, tape);

    let report = read_blocks(&merged);
    assert!(report.stop.is_end_of_stream());
    let recovered: Vec<u8> = report
        .into_blocks()
        .iter()
        .flat_map(|b| b.data().to_vec())
        .collect();
    assert_eq!(recovered, program);
}

#[test]
fn splice_reports_unrelated_recording() {
    let td = tempdir().unwrap();
    let (_, tape) = create_tape();
    let other = encode_tape(0x8000, &[0x5Au8; 1024]).unwrap().to_vec();

    let inputs = vec![
        write(td.path(), "front.cas", &tape[..PILOT_LEN + 2 * BLOCK]),
        write(td.path(), "other.cas", &other[PILOT_LEN + 2 * BLOCK..]),
    ];
    let out_path = td.path().join("merged.cas");

    let outcome = splice::execute(&inputs, out_path.to_str().unwrap()).unwrap();

    // Block numbers line up, load addresses do not
    assert_eq!(outcome.blocks_written, 4);
    assert_eq!(outcome.address_breaks, 1);
}
