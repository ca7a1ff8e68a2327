//! MSB-first bit stream operations.
//!
//! Codes are packed most significant bit first. The writer can start from a
//! non-empty buffer so the ASCII preamble and the code stream share one
//! output vector; the reader is handed the slice that follows the preamble.

use crate::error::{LzwError, Result};

/// Widest code the transport carries.
const MAX_WIDTH: u8 = 32;

/// MSB-first bit reader for LZW decompression.
#[derive(Debug)]
pub struct MsbBitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current byte position.
    byte_pos: usize,
    /// Bit buffer (MSB-first, valid bits at the bottom).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
}

impl<'a> MsbBitReader<'a> {
    /// Create a new MSB bit reader.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Fill buffer with at least `count` bits if the input allows.
    #[inline]
    fn fill_buffer(&mut self, count: u8) {
        while self.bits_in_buffer < count && self.byte_pos < self.data.len() {
            let byte = self.data[self.byte_pos];
            self.byte_pos += 1;

            self.buffer = (self.buffer << 8) | u64::from(byte);
            self.bits_in_buffer += 8;
        }
    }

    /// Read `count` bits (1-32).
    ///
    /// Returns `Ok(None)` when fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: u8) -> Result<Option<u32>> {
        if count == 0 || count > MAX_WIDTH {
            return Err(LzwError::InvalidBitWidth(count));
        }

        self.fill_buffer(count);
        if self.bits_in_buffer < count {
            return Ok(None);
        }

        let shift = self.bits_in_buffer - count;
        let mask = (1u64 << count) - 1;
        let value = (self.buffer >> shift) & mask;

        self.bits_in_buffer -= count;

        Ok(Some(value as u32))
    }
}

/// MSB-first bit writer for LZW compression.
#[derive(Debug)]
pub struct MsbBitWriter {
    /// Output buffer.
    output: Vec<u8>,
    /// Bit buffer (MSB-first).
    buffer: u64,
    /// Number of bits in buffer.
    bits_in_buffer: u8,
}

impl MsbBitWriter {
    /// Create a new MSB bit writer.
    pub fn new() -> Self {
        Self::with_output(Vec::new())
    }

    /// Create a writer that appends codes after `output`.
    pub fn with_output(output: Vec<u8>) -> Self {
        Self {
            output,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Write the low `count` bits (1-32) of `value`.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        if count == 0 || count > MAX_WIDTH {
            return Err(LzwError::InvalidBitWidth(count));
        }
        debug_assert!(
            count == MAX_WIDTH || value >> count == 0,
            "value {} does not fit in {} bits",
            value,
            count
        );

        let mask = (1u64 << count) - 1;
        self.buffer = (self.buffer << count) | (u64::from(value) & mask);
        self.bits_in_buffer += count;

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }

        Ok(())
    }

    /// Flush remaining bits, padding with zeros if needed.
    pub fn flush(&mut self) {
        if self.bits_in_buffer > 0 {
            let remaining = 8 - self.bits_in_buffer;
            let byte = ((self.buffer << remaining) & 0xFF) as u8;
            self.output.push(byte);
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
    }

    /// Flush and get the output data.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.flush();
        self.output
    }
}

impl Default for MsbBitWriter {
    fn default() -> Self {
        Self::new()
    }
}
