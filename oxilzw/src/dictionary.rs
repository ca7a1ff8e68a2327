//! LZW dictionary (code table) management.
//!
//! Entries live in a dense, code-indexed array. A second, open-addressed
//! table keyed by `(prefix, symbol)` stores codes into that array, so both
//! lookup directions always observe the same entry values.

use crate::config::LzwConfig;
use crate::control::{ControlCode, EMPTY_CODE};
use crate::error::Result;

/// Marks an unused hash slot.
const VACANT: u32 = u32::MAX;

/// One dictionary string: its prefix string plus one appended symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Code of the string this entry extends (0 = empty string).
    pub prefix: u32,
    /// Appended byte, or a negative sentinel for control entries.
    pub symbol: i32,
    /// Code assigned to this entry.
    pub code: u32,
    /// Clock value of the last transmission or receipt; 0 = never used.
    pub last_use: i64,
}

impl Entry {
    /// The appended byte, or `None` for control entries.
    pub fn byte(&self) -> Option<u8> {
        u8::try_from(self.symbol).ok()
    }

    /// Whether this is one of the reserved control entries.
    pub fn is_control(&self) -> bool {
        self.symbol < 0
    }
}

/// Outcome of [`Dictionary::insert`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// New entry stored.
    Inserted(u32),
    /// New entry stored and the code width grew by one bit.
    WidthGrew(u32),
    /// New entry stored and it filled the code space; the dictionary must be
    /// pruned before the next insertion.
    PruneRequired(u32),
    /// The pair was already present; nothing changed.
    Present(u32),
    /// The code space is exhausted; nothing changed.
    Full,
    /// No free hash slot was found; nothing changed.
    Exhausted,
}

impl Insertion {
    /// Code of the stored or existing entry, if any.
    pub fn code(self) -> Option<u32> {
        match self {
            Self::Inserted(code)
            | Self::WidthGrew(code)
            | Self::PruneRequired(code)
            | Self::Present(code) => Some(code),
            Self::Full | Self::Exhausted => None,
        }
    }
}

/// Result of walking a probe sequence.
enum Probe {
    Found(u32),
    Vacant(usize),
    Wrapped,
}

/// Adaptive LZW dictionary shared by the encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    /// Configuration.
    config: LzwConfig,
    /// Pair-keyed hash table holding codes.
    slots: Vec<u32>,
    /// Code-indexed entries.
    entries: Vec<Entry>,
    /// Current code bit width.
    code_width: u8,
}

impl Dictionary {
    /// Create a freshly seeded dictionary.
    ///
    /// The six control entries always come first; the 256 single-character
    /// entries follow unless escape mode is on.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;

        let seeded = if config.escape { 6 } else { 6 + 256 };
        let mut dict = Self {
            config,
            slots: vec![VACANT; config.table_size()],
            entries: Vec::with_capacity(seeded.max(1024)),
            code_width: 1,
        };

        for control in ControlCode::ALL {
            let _ = dict.insert(EMPTY_CODE, control.symbol(), 0);
        }
        if !config.escape {
            for byte in 0..=u8::MAX {
                let _ = dict.insert(EMPTY_CODE, i32::from(byte), 0);
            }
        }

        Ok(dict)
    }

    /// Home slot of a pair.
    #[inline]
    fn home_slot(&self, prefix: u32, symbol: i32) -> usize {
        // Nine symbol bits keep control sentinels apart from real bytes.
        let key = (u64::from(prefix) << 9) | u64::from(symbol as u32 & 0x1ff);
        (key % self.slots.len() as u64) as usize
    }

    /// Linear probe for `(prefix, symbol)`.
    fn probe(&self, prefix: u32, symbol: i32) -> Probe {
        let start = self.home_slot(prefix, symbol);
        let mut slot = start;

        loop {
            let code = self.slots[slot];
            if code == VACANT {
                return Probe::Vacant(slot);
            }

            let entry = &self.entries[code as usize];
            if entry.prefix == prefix && entry.symbol == symbol {
                return Probe::Found(code);
            }

            slot += 1;
            if slot == self.slots.len() {
                slot = 0;
            }
            if slot == start {
                return Probe::Wrapped;
            }
        }
    }

    /// Find the entry for `(prefix, symbol)`.
    pub fn search(&self, prefix: u32, symbol: i32) -> Option<&Entry> {
        match self.probe(prefix, symbol) {
            Probe::Found(code) => self.entries.get(code as usize),
            Probe::Vacant(_) | Probe::Wrapped => None,
        }
    }

    /// Find the entry for a single byte appended to `prefix`.
    pub fn search_byte(&self, prefix: u32, byte: u8) -> Option<&Entry> {
        self.search(prefix, i32::from(byte))
    }

    /// Get the entry assigned to `code`.
    pub fn lookup(&self, code: u32) -> Option<&Entry> {
        self.entries.get(code as usize)
    }

    /// Insert `(prefix, symbol)` under the next free code.
    ///
    /// Ordinary insertions pass `last_use = 0`; an entry learned through an
    /// escape is stamped with the current time.
    pub fn insert(&mut self, prefix: u32, symbol: i32, last_use: i64) -> Insertion {
        let slot = match self.probe(prefix, symbol) {
            Probe::Found(code) => return Insertion::Present(code),
            Probe::Wrapped => return Insertion::Exhausted,
            Probe::Vacant(slot) => slot,
        };

        if self.entries.len() > self.config.max_code() as usize {
            return Insertion::Full;
        }

        debug_assert!(
            (prefix as usize) < self.entries.len() || self.entries.is_empty(),
            "prefix {} does not exist",
            prefix
        );

        let code = self.entries.len() as u32;
        let grew = code >> self.code_width != 0;
        if grew {
            self.code_width += 1;
        }

        self.entries.push(Entry {
            prefix,
            symbol,
            code,
            last_use,
        });
        self.slots[slot] = code;

        if grew {
            Insertion::WidthGrew(code)
        } else if self.config.pruning_enabled()
            && self.entries.len() > self.config.max_code() as usize
        {
            Insertion::PruneRequired(code)
        } else {
            Insertion::Inserted(code)
        }
    }

    /// Record a use of `code` at `time`.
    ///
    /// `last_use` only moves forward. Returns `false` for unknown codes.
    pub fn touch(&mut self, code: u32, time: i64) -> bool {
        match self.entries.get_mut(code as usize) {
            Some(entry) => {
                if time > entry.last_use {
                    entry.last_use = time;
                }
                true
            }
            None => false,
        }
    }

    /// Grow the code width by one bit. Fails at the maximum width.
    pub fn grow_width(&mut self) -> bool {
        if self.code_width < self.config.max_bits {
            self.code_width += 1;
            true
        } else {
            false
        }
    }

    /// Walk the prefix chain of `code`.
    ///
    /// Pushes every character except the first onto `stack`, last character
    /// first, and returns the first character. Emitting the root followed by
    /// the stack in reverse reproduces the string. Returns `None` for control
    /// or unknown codes and for chains that do not reach the root.
    pub fn expand(&self, code: u32, stack: &mut Vec<u8>) -> Option<u8> {
        stack.clear();
        let mut entry = self.lookup(code)?;

        for _ in 0..self.entries.len() {
            if entry.prefix == EMPTY_CODE {
                return entry.byte();
            }
            stack.push(entry.byte()?);
            entry = self.lookup(entry.prefix)?;
        }

        None
    }

    /// Spell the string of `code` into `out`, first character first.
    pub fn spell(&self, code: u32, out: &mut Vec<u8>) -> bool {
        match self.expand(code, out) {
            Some(root) => {
                out.push(root);
                out.reverse();
                true
            }
            None => false,
        }
    }

    /// Shift every timestamp back by `shift`, clamping to "never used".
    pub fn rebase(&mut self, shift: i64) {
        for entry in &mut self.entries {
            entry.last_use = if entry.last_use > shift {
                entry.last_use - shift
            } else {
                0
            };
        }
    }

    /// All entries in code order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries (never true once seeded).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Code the next insertion will receive.
    pub fn next_code(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Current code bit width.
    pub fn code_width(&self) -> u8 {
        self.code_width
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzwConfig {
        &self.config
    }
}
