//! # Nastape Core
//!
//! Recovery and validation of NASCOM cassette tape captures.
//!
//! ## Modules
//!
//! - `constants`: Block format constants and limits
//! - `types`: Core types (TapeBlock, BlockHeader)
//! - `checksum`: The rollover checksum
//! - `encoder`: Block and tape encoding
//! - `decoder`: Strict block decoding
//! - `scanner`: Pilot detection, resynchronization and scan passes
//! - `completeness`: Completeness checks and sequence analysis

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod checksum;
pub mod completeness;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use completeness::{Completeness, OutputMode};
pub use error::{BlockError, ErrorClass};
pub use scanner::{read_blocks, LocatedBlock, ScanReport};
pub use types::{BlockHeader, TapeBlock};

/// Result type alias for tape operations
pub type Result<T> = core::result::Result<T, BlockError>;
