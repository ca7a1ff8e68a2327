//! # OxiLZW: Adaptive LZW with Windowed Pruning
//!
//! This crate provides a Lempel-Ziv-Welch compressor and decompressor whose
//! dictionary adapts to the data as it streams past.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Growing code widths**: Codes start narrow and widen one bit at a
//!   time, signalled in-band
//! - **Windowed pruning**: When the code space fills, strings not used
//!   within the last `window` clock ticks are evicted
//! - **Escape mode**: Single characters are learned on first use instead of
//!   being pre-seeded, so small alphabets start with short codes
//! - **Self-describing streams**: Every stream opens with an ASCII preamble
//!   carrying its parameters
//!
//! ## Stream Format
//!
//! ```text
//! MAXBITS:WINDOW:ESCAPE:<codes, MSB-first, zero-padded to a byte>
//! ```
//!
//! Codes 0-5 are reserved controls (empty string, escape, width increment,
//! prune, spacer, end of stream). Without escape mode codes 6-261 are the
//! 256 single bytes and codes start 9 bits wide.
//!
//! ## Example
//!
//! ```rust
//! use oxilzw::{compress, decompress, LzwConfig};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//! let config = LzwConfig::new(12).with_window(1000);
//!
//! let compressed = compress(original, config).unwrap();
//! let decompressed = decompress(&compressed).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod bitstream_msb;
mod clock;
mod config;
mod control;
mod decoder;
mod dictionary;
mod encoder;
mod error;
mod prune;
mod stats;

pub use bitstream_msb::{MsbBitReader, MsbBitWriter};
pub use clock::{Clock, REBASE_FLOOR, REBASE_THRESHOLD};
pub use config::LzwConfig;
pub use control::{CONTROL_CODES, ControlCode, EMPTY_CODE, RAW_SYMBOL_BITS};
pub use decoder::LzwDecoder;
pub use dictionary::{Dictionary, Entry, Insertion};
pub use encoder::LzwEncoder;
pub use error::{LzwError, Result};
pub use prune::{is_recent, prune};
pub use stats::CodecStats;

/// Decompress one LZW stream.
///
/// The configuration is read from the stream preamble.
///
/// # Example
///
/// ```rust
/// use oxilzw::{compress, decompress, LzwConfig};
///
/// let original = b"Hello, World!";
/// let compressed = compress(original, LzwConfig::DEFAULT).unwrap();
/// let decompressed = decompress(&compressed).unwrap();
/// assert_eq!(decompressed, original);
/// ```
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    LzwDecoder::new().decode(data)
}

/// Compress data with LZW using the given configuration.
///
/// # Example
///
/// ```rust
/// use oxilzw::{compress, LzwConfig};
///
/// let data = b"TOBEORNOTTOBEORTOBEORNOT";
/// let compressed = compress(data, LzwConfig::DEFAULT).unwrap();
/// assert!(compressed.starts_with(b"12:0:0:"));
/// ```
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut encoder = LzwEncoder::new(config)?;
    encoder.encode(data)
}
