//! Reserved control codes.
//!
//! The first six codes of every dictionary are control entries. Their
//! numbers never change with the code width, and each is stored in the
//! dictionary with a distinct negative symbol so it can never collide with a
//! real byte.

/// A reserved control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCode {
    /// The empty string; root of every prefix chain.
    Empty,
    /// A raw 8-bit byte follows.
    Escape,
    /// Grow the code width by one bit.
    IncrementWidth,
    /// The dictionary is rebuilt after the next code.
    Prune,
    /// Payload of a prune whose character already went out raw.
    Spacer,
    /// End of the code stream.
    EndOfStream,
}

/// Number of reserved control codes.
pub const CONTROL_CODES: u32 = 6;

/// Code of the empty string.
pub const EMPTY_CODE: u32 = 0;

/// Width of the raw byte following an escape.
pub const RAW_SYMBOL_BITS: u8 = 8;

impl ControlCode {
    /// All control codes in code order.
    pub const ALL: [Self; 6] = [
        Self::Empty,
        Self::Escape,
        Self::IncrementWidth,
        Self::Prune,
        Self::Spacer,
        Self::EndOfStream,
    ];

    /// The code transmitted for this control.
    pub const fn code(self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Escape => 1,
            Self::IncrementWidth => 2,
            Self::Prune => 3,
            Self::Spacer => 4,
            Self::EndOfStream => 5,
        }
    }

    /// Symbol stored in the control entry (-1 for code 0, -2 for code 1, ...).
    pub const fn symbol(self) -> i32 {
        -1 - self.code() as i32
    }

    /// Classify a received code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}
