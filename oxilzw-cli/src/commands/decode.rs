//! Decode command implementation.

use crate::utils::{display_name, read_input, write_output};
use oxilzw::LzwDecoder;
use std::path::Path;
use tracing::info;

pub fn cmd_decode(
    input: Option<&Path>,
    output: Option<&Path>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_input(input)?;

    let mut decoder = LzwDecoder::new();
    let decoded = decoder.decode(&data)?;
    write_output(output, &decoded)?;

    let stats = decoder.stats();
    info!(
        input = %display_name(input, "<stdin>"),
        compressed = data.len(),
        decoded = decoded.len(),
        codes = stats.codes,
        prunes = stats.prunes,
        "decoded"
    );

    if verbose && output.is_some() {
        println!("{} -> {} bytes", data.len(), decoded.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxilzw::{LzwConfig, compress};

    #[test]
    fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.lzw");
        let output = dir.path().join("data.txt");
        let original = b"She sells sea shells by the sea shore. ".repeat(30);
        let stream = compress(&original, LzwConfig::new(10).with_window(100)).unwrap();
        std::fs::write(&input, stream).unwrap();

        cmd_decode(Some(&input), Some(&output), false).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), original);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("junk.lzw");
        let output = dir.path().join("junk.txt");
        std::fs::write(&input, b"not a stream").unwrap();

        let err = cmd_decode(Some(&input), Some(&output), false).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(!output.exists());
    }
}
