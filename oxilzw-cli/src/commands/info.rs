//! Info command implementation.

use crate::utils::{read_input, space_savings};
use oxilzw::{LzwConfig, LzwDecoder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters and statistics of one stream.
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamInfo {
    file: String,
    size: usize,
    max_bits: u8,
    window: i64,
    escape: bool,
    preamble_size: usize,
    decoded_size: usize,
    codes: u64,
    prunes: u64,
    width_increments: u64,
    escapes: u64,
    final_entries: usize,
    final_code_width: u8,
}

impl StreamInfo {
    /// Decode `data` and collect what it reveals.
    pub fn analyze(file: &Path, data: &[u8]) -> oxilzw::Result<Self> {
        let (config, preamble_size) = LzwConfig::parse_preamble(data)?;

        let mut decoder = LzwDecoder::new();
        let decoded = decoder.decode(data)?;
        let stats = decoder.stats();
        let (final_entries, final_code_width) = decoder
            .dictionary()
            .map(|dict| (dict.len(), dict.code_width()))
            .unwrap_or_default();

        Ok(Self {
            file: file.display().to_string(),
            size: data.len(),
            max_bits: config.max_bits,
            window: config.window,
            escape: config.escape,
            preamble_size,
            decoded_size: decoded.len(),
            codes: stats.codes,
            prunes: stats.prunes,
            width_increments: stats.width_increments,
            escapes: stats.escapes,
            final_entries,
            final_code_width,
        })
    }
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_input(Some(file))?;
    let info = StreamInfo::analyze(file, &data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Stream Information");
    println!("==================");
    println!("File: {}", info.file);
    println!("Size: {} bytes", info.size);
    println!();
    println!("Parameters:");
    println!("  Max code width: {} bits", info.max_bits);
    if info.window > 0 {
        println!("  Pruning window: {} codes", info.window);
    } else {
        println!("  Pruning window: disabled");
    }
    println!(
        "  Escape mode: {}",
        if info.escape { "enabled" } else { "disabled" }
    );
    println!();
    println!("Contents:");
    println!("  Decoded size: {} bytes", info.decoded_size);
    if info.decoded_size > 0 {
        println!(
            "  Space savings: {:.1}%",
            space_savings(info.decoded_size, info.size)
        );
    }
    println!("  Codes: {}", info.codes);
    println!("  Prunes: {}", info.prunes);
    println!("  Width increments: {}", info.width_increments);
    println!("  Escapes: {}", info.escapes);
    println!(
        "  Final dictionary: {} entries, {}-bit codes",
        info.final_entries, info.final_code_width
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxilzw::compress;

    #[test]
    fn test_analyze_stream() {
        let original = b"how much wood would a woodchuck chuck ".repeat(50);
        let config = LzwConfig::new(9).with_window(60).with_escape(true);
        let stream = compress(&original, config).unwrap();

        let info = StreamInfo::analyze(Path::new("wood.lzw"), &stream).unwrap();
        assert_eq!(info.max_bits, 9);
        assert_eq!(info.window, 60);
        assert!(info.escape);
        assert_eq!(info.preamble_size, 7);
        assert_eq!(info.decoded_size, original.len());
        assert_eq!(info.size, stream.len());
        assert!(info.escapes > 0);
    }

    #[test]
    fn test_json_fields() {
        let stream = compress(b"abc", LzwConfig::DEFAULT).unwrap();
        let info = StreamInfo::analyze(Path::new("abc.lzw"), &stream).unwrap();
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["max_bits"], 12);
        assert_eq!(value["window"], 0);
        assert_eq!(value["escape"], false);
        assert_eq!(value["decoded_size"], 3);
        assert_eq!(value["file"], "abc.lzw");
    }

    #[test]
    fn test_analyze_rejects_bad_preamble() {
        assert!(StreamInfo::analyze(Path::new("x"), b"1:2").is_err());
    }
}
