use anyhow::{Context, Result};
use nastape_core::encoder::encode_tape;
use std::fs;
use tracing::info;

/// Pack a binary program image into a clean tape capture
pub fn execute(input: &str, output: &str, load_address: u16) -> Result<()> {
    info!("Packing {} to {} at {:04x}", input, output, load_address);

    let program =
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?;

    let tape = encode_tape(load_address, &program)
        .with_context(|| format!("Failed to encode {}", input))?;

    fs::write(output, &tape)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully packed {} bytes into {} blocks ({} bytes total)",
        program.len(),
        program.len().div_ceil(nastape_core::constants::MAX_DATA_SIZE),
        tape.len()
    );

    Ok(())
}
