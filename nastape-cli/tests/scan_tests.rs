use std::fs;
use tempfile::tempdir;

use nastape_cli::commands::scan;
use nastape_core::{constants::PILOT_LEN, encoder::encode_tape};

/// Helper: create a clean tape from a program of `len` bytes
fn create_test_tape(len: usize) -> Vec<u8> {
    let program: Vec<u8> = (0..len).map(|i| (i % 200) as u8 + 1).collect();
    encode_tape(0x1000, &program).unwrap().to_vec()
}

fn scan_to_json(data: &[u8]) -> serde_json::Value {
    let td = tempdir().unwrap();
    let input_path = td.path().join("capture.cas");
    let output_path = td.path().join("output.json");
    fs::write(&input_path, data).unwrap();

    scan::execute(
        input_path.to_str().unwrap(),
        Some(output_path.to_str().unwrap()),
        false,
    )
    .unwrap();

    assert!(output_path.exists());
    let output_json = fs::read_to_string(&output_path).unwrap();
    serde_json::from_str(&output_json).unwrap()
}

#[test]
fn test_scan_basic_file() {
    let json = scan_to_json(&create_test_tape(600));

    let blocks = json["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0]["offset"], PILOT_LEN);
    assert_eq!(blocks[0]["block_no"], 2);
    assert_eq!(blocks[0]["load_address"], 0x1000);
    assert_eq!(blocks[0]["first_block"], true);
    assert_eq!(blocks[2]["data_size"], 88);
    assert_eq!(json["pilot_found"], true);
    assert_eq!(json["stop_class"], "stream_exhausted");
    assert_eq!(json["completeness"]["has_beginning"], true);
    assert_eq!(json["completeness"]["has_end"], true);
}

#[test]
fn test_scan_data_is_hex() {
    let tape = encode_tape(0x0C80, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

    let json = scan_to_json(&tape);

    assert_eq!(json["blocks"][0]["data"], "deadbeef");
    assert_eq!(json["blocks"][0]["data_checksum"], 0xDE + 0xAD + 0xBE + 0xEF - 3 * 256);
}

#[test]
fn test_scan_damaged_file() {
    let mut data = create_test_tape(1024);
    data[PILOT_LEN + 277 + 100] = data[PILOT_LEN + 277 + 100].wrapping_add(1);

    let json = scan_to_json(&data);

    assert_eq!(json["blocks"].as_array().unwrap().len(), 1);
    assert_eq!(json["stop_class"], "integrity");
    assert!(json["stop_reason"]
        .as_str()
        .unwrap()
        .contains("Data checksum mismatch"));
    assert_eq!(json["completeness"]["has_end"], false);
}

#[test]
fn test_scan_reports_gaps() {
    let tape = create_test_tape(1024);
    let block = 277;
    let mut data = tape[..PILOT_LEN + block].to_vec();
    data.extend_from_slice(&tape[PILOT_LEN + 2 * block..]);

    let json = scan_to_json(&data);

    let gaps = json["gaps"].as_array().unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0]["before"], 3);
    assert_eq!(gaps[0]["after"], 1);
}

#[test]
fn test_scan_empty_file() {
    let json = scan_to_json(&[]);

    assert!(json["blocks"].as_array().unwrap().is_empty());
    assert_eq!(json["pilot_found"], false);
    assert_eq!(json["completeness"]["block_count"], 0);
}

#[test]
fn test_scan_stats_only() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("capture.cas");
    let output_path = td.path().join("output.json");
    fs::write(&input_path, create_test_tape(100)).unwrap();

    scan::execute(
        input_path.to_str().unwrap(),
        Some(output_path.to_str().unwrap()),
        true,
    )
    .unwrap();

    assert!(!output_path.exists());
}

#[test]
fn test_scan_to_stdout() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("capture.cas");
    fs::write(&input_path, create_test_tape(300)).unwrap();

    scan::execute(input_path.to_str().unwrap(), None, false).unwrap();
}
