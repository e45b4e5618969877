//! Library entry for nastape-cli used by integration tests and embedding.

pub mod commands;

use std::path::{Path, PathBuf};

// Re-export commands for convenience
pub use commands::*;

/// Default output path for a cleaned capture: `<stem>_cleaned<.ext>` next to the input
pub fn cleaned_file_name(input: &str) -> PathBuf {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match path.extension() {
        Some(ext) => format!("{}_cleaned.{}", stem, ext.to_string_lossy()),
        None => format!("{}_cleaned", stem),
    };

    path.with_file_name(name)
}

/// Parse a load address given as hex, with or without a `0x` prefix
pub fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid load address '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_file_name() {
        assert_eq!(cleaned_file_name("game.cas"), PathBuf::from("game_cleaned.cas"));
        assert_eq!(
            cleaned_file_name("dumps/run2/game.cas"),
            PathBuf::from("dumps/run2/game_cleaned.cas")
        );
        assert_eq!(cleaned_file_name("capture"), PathBuf::from("capture_cleaned"));
        // A dot in the directory is not an extension
        assert_eq!(
            cleaned_file_name("dir.v2/capture"),
            PathBuf::from("dir.v2/capture_cleaned")
        );
        assert_eq!(
            cleaned_file_name("dir.v2/capture.cas"),
            PathBuf::from("dir.v2/capture_cleaned.cas")
        );
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x1000"), Ok(0x1000));
        assert_eq!(parse_address("0C80"), Ok(0x0C80));
        assert!(parse_address("10000").is_err());
        assert!(parse_address("zz").is_err());
    }
}
