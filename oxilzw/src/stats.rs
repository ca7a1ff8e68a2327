//! Per-stream counters.

/// Counters collected while coding one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecStats {
    /// Codes written or read, control codes included.
    pub codes: u64,
    /// Dictionary rebuilds.
    pub prunes: u64,
    /// Explicit width increments signalled in the stream.
    pub width_increments: u64,
    /// Characters learned through escapes.
    pub escapes: u64,
}
