//! Encode command implementation.

use crate::utils::{display_name, read_input, space_savings, write_output};
use oxilzw::{LzwConfig, LzwEncoder};
use std::path::Path;
use tracing::{info, warn};

/// Flags of the encode command.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub max_bits: Option<u32>,
    pub window: Option<i64>,
    pub escape: bool,
    pub verbose: bool,
}

impl EncodeOptions {
    /// Build the stream configuration, falling back to the default width
    /// when the requested one is out of range.
    pub fn config(&self) -> LzwConfig {
        let max_bits = match self.max_bits {
            None => LzwConfig::DEFAULT_MAX_BITS,
            Some(bits) => match u8::try_from(bits) {
                Ok(bits) if (LzwConfig::MIN_MAX_BITS..=LzwConfig::MAX_MAX_BITS).contains(&bits) => {
                    bits
                }
                _ => {
                    warn!(
                        requested = bits,
                        fallback = LzwConfig::DEFAULT_MAX_BITS,
                        "max bits out of range {}-{}",
                        LzwConfig::MIN_MAX_BITS,
                        LzwConfig::MAX_MAX_BITS
                    );
                    LzwConfig::DEFAULT_MAX_BITS
                }
            },
        };

        LzwConfig::new(max_bits)
            .with_window(self.window.unwrap_or(0))
            .with_escape(self.escape)
    }
}

pub fn cmd_encode(
    input: Option<&Path>,
    output: Option<&Path>,
    options: &EncodeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = options.config();
    let data = read_input(input)?;

    let mut encoder = LzwEncoder::new(config)?;
    let compressed = encoder.encode(&data)?;
    write_output(output, &compressed)?;

    let stats = encoder.stats();
    info!(
        input = %display_name(input, "<stdin>"),
        preamble = %config.preamble(),
        original = data.len(),
        compressed = compressed.len(),
        savings = %format!("{:.1}%", space_savings(data.len(), compressed.len())),
        codes = stats.codes,
        prunes = stats.prunes,
        escapes = stats.escapes,
        "encoded"
    );

    if options.verbose && output.is_some() {
        println!(
            "{} -> {} bytes ({:.1}% saved)",
            data.len(),
            compressed.len(),
            space_savings(data.len(), compressed.len())
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EncodeOptions::default().config();
        assert_eq!(config, LzwConfig::DEFAULT);
    }

    #[test]
    fn test_config_from_flags() {
        let options = EncodeOptions {
            max_bits: Some(16),
            window: Some(4000),
            escape: true,
            verbose: false,
        };
        assert_eq!(
            options.config(),
            LzwConfig::new(16).with_window(4000).with_escape(true)
        );
    }

    #[test]
    fn test_out_of_range_bits_fall_back() {
        for bits in [1, 8, 25, 300, u32::MAX] {
            let options = EncodeOptions {
                max_bits: Some(bits),
                ..EncodeOptions::default()
            };
            assert_eq!(options.config().max_bits, 12, "bits {}", bits);
        }
    }

    #[test]
    fn test_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        let output = dir.path().join("plain.lzw");
        std::fs::write(&input, b"abababababababab").unwrap();

        let options = EncodeOptions {
            max_bits: Some(9),
            window: Some(10),
            ..EncodeOptions::default()
        };
        cmd_encode(Some(&input), Some(&output), &options).unwrap();

        let stream = std::fs::read(&output).unwrap();
        assert!(stream.starts_with(b"9:10:0:"));
        assert_eq!(oxilzw::decompress(&stream).unwrap(), b"abababababababab");
    }
}
