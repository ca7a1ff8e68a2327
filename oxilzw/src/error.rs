//! LZW-specific error types.
//!
//! Every failure raised while a stream is being coded carries the logical
//! clock value at the moment it was detected.

use thiserror::Error;

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// An illegal code or control-code sequence was received.
    #[error("Protocol violation at time {time}: {reason}")]
    ProtocolViolation {
        /// Logical clock value when the violation was detected.
        time: i64,
        /// What was wrong with the stream.
        reason: String,
    },

    /// The stream ended before the end-of-stream code.
    #[error("Stream truncated at time {time}: {context}")]
    StreamTruncated {
        /// Logical clock value when the stream ran dry.
        time: i64,
        /// What the decoder was waiting for.
        context: &'static str,
    },

    /// The hash table ran out of physical slots.
    #[error("Dictionary exhausted at time {time} ({entries} entries)")]
    DictionaryExhausted {
        /// Logical clock value at the failed insertion.
        time: i64,
        /// Number of live entries at the failed insertion.
        entries: usize,
    },

    /// A single-character entry the protocol relies on is absent.
    #[error("Missing single-character entry for byte {symbol:#04x} at time {time}")]
    MissingSymbol {
        /// Logical clock value when the lookup failed.
        time: i64,
        /// The byte whose entry was missing.
        symbol: u8,
    },

    /// Configuration or preamble out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid bit width passed to the bit transport.
    #[error("Invalid bit width: {0} (must be 1-32)")]
    InvalidBitWidth(u8),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LzwError {
    /// Create a protocol violation error.
    pub fn violation(time: i64, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            time,
            reason: reason.into(),
        }
    }

    /// Create a stream truncation error.
    pub fn truncated(time: i64, context: &'static str) -> Self {
        Self::StreamTruncated { time, context }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Logical clock value attached to the error, if it arose mid-stream.
    pub fn time(&self) -> Option<i64> {
        match self {
            Self::ProtocolViolation { time, .. }
            | Self::StreamTruncated { time, .. }
            | Self::DictionaryExhausted { time, .. }
            | Self::MissingSymbol { time, .. } => Some(*time),
            _ => None,
        }
    }
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;
