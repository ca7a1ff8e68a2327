//! LZW configuration and its on-wire preamble.
//!
//! The three parameters that shape a dictionary are fixed for the lifetime
//! of a stream and travel in front of the code stream as ASCII text:
//!
//! ```text
//! MAXBITS:WINDOW:ESCAPE:
//! ```
//!
//! e.g. `12:0:0:` for 12-bit codes, no pruning, pre-seeded single characters.

use crate::error::{LzwError, Result};

/// Longest decimal field accepted in a preamble (fits any `i64`).
const MAX_FIELD_LEN: usize = 20;

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Maximum code size in bits (9-24).
    pub max_bits: u8,
    /// Pruning window in clock ticks. 0 disables pruning.
    pub window: i64,
    /// Learn single-character strings through escape sequences instead of
    /// pre-seeding all 256 of them.
    pub escape: bool,
}

impl LzwConfig {
    /// Smallest accepted maximum code width.
    pub const MIN_MAX_BITS: u8 = 9;

    /// Largest accepted maximum code width.
    pub const MAX_MAX_BITS: u8 = 24;

    /// Maximum code width used when none is given.
    pub const DEFAULT_MAX_BITS: u8 = 12;

    /// Largest accepted pruning window.
    pub const MAX_WINDOW: i64 = i64::MAX / 4;

    /// Default configuration: 12-bit codes, no pruning, no escapes.
    pub const DEFAULT: Self = Self {
        max_bits: Self::DEFAULT_MAX_BITS,
        window: 0,
        escape: false,
    };

    /// Create a configuration with the given maximum code width.
    pub fn new(max_bits: u8) -> Self {
        Self {
            max_bits,
            ..Self::DEFAULT
        }
    }

    /// Set the pruning window (0 disables pruning).
    pub fn with_window(mut self, window: i64) -> Self {
        self.window = window;
        self
    }

    /// Enable or disable escape mode.
    pub fn with_escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_MAX_BITS..=Self::MAX_MAX_BITS).contains(&self.max_bits) {
            return Err(LzwError::invalid_config(format!(
                "max bits {} out of range {}-{}",
                self.max_bits,
                Self::MIN_MAX_BITS,
                Self::MAX_MAX_BITS
            )));
        }
        if !(0..=Self::MAX_WINDOW).contains(&self.window) {
            return Err(LzwError::invalid_config(format!(
                "window {} out of range 0-{}",
                self.window,
                Self::MAX_WINDOW
            )));
        }
        Ok(())
    }

    /// Whether stale entries are evicted.
    pub fn pruning_enabled(&self) -> bool {
        self.window > 0
    }

    /// Highest code that can be assigned.
    pub fn max_code(&self) -> u32 {
        (1 << self.max_bits) - 1
    }

    /// Number of physical slots in the pair-keyed hash table.
    pub fn table_size(&self) -> usize {
        1 + (1usize << (self.max_bits + 1))
    }

    /// Render the preamble that opens every stream.
    pub fn preamble(&self) -> String {
        format!(
            "{}:{}:{}:",
            self.max_bits,
            self.window,
            u8::from(self.escape)
        )
    }

    /// Parse a preamble from the start of `data`.
    ///
    /// Returns the configuration and the number of bytes consumed; the code
    /// stream begins right after.
    pub fn parse_preamble(data: &[u8]) -> Result<(Self, usize)> {
        let mut fields = [0i64; 3];
        let mut pos = 0;

        for (index, field) in fields.iter_mut().enumerate() {
            let rest = &data[pos..];
            let end = rest
                .iter()
                .take(MAX_FIELD_LEN + 1)
                .position(|&b| b == b':')
                .ok_or_else(|| {
                    LzwError::invalid_config(format!(
                        "preamble field {} is not colon-terminated",
                        index + 1
                    ))
                })?;

            let digits = &rest[..end];
            if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
                return Err(LzwError::invalid_config(format!(
                    "preamble field {} is not a decimal number",
                    index + 1
                )));
            }

            // All ASCII digits, so the slice is valid UTF-8.
            *field = std::str::from_utf8(digits)
                .ok()
                .and_then(|text| text.parse().ok())
                .ok_or_else(|| {
                    LzwError::invalid_config(format!("preamble field {} overflows", index + 1))
                })?;
            pos += end + 1;
        }

        let [max_bits, window, escape] = fields;
        let max_bits = u8::try_from(max_bits).map_err(|_| {
            LzwError::invalid_config(format!("max bits {} out of range", max_bits))
        })?;
        let escape = match escape {
            0 => false,
            1 => true,
            other => {
                return Err(LzwError::invalid_config(format!(
                    "escape flag must be 0 or 1, found {}",
                    other
                )));
            }
        };

        let config = Self {
            max_bits,
            window,
            escape,
        };
        config.validate()?;
        Ok((config, pos))
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
