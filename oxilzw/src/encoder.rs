//! LZW encoder (compression).

use crate::bitstream_msb::MsbBitWriter;
use crate::clock::Clock;
use crate::config::LzwConfig;
use crate::control::{ControlCode, EMPTY_CODE, RAW_SYMBOL_BITS};
use crate::dictionary::{Dictionary, Insertion};
use crate::error::{LzwError, Result};
use crate::prune::prune;
use crate::stats::CodecStats;
use tracing::{debug, trace};

/// LZW encoder for compression.
#[derive(Debug)]
pub struct LzwEncoder {
    /// Dictionary for string lookup.
    dict: Dictionary,
    /// Logical clock driving pruning.
    clock: Clock,
    /// Counters for the last stream.
    stats: CodecStats,
}

impl LzwEncoder {
    /// Create a new LZW encoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        Self::with_clock(config, Clock::new())
    }

    /// Create an encoder whose clock uses custom rebase limits.
    pub fn with_clock(config: LzwConfig, clock: Clock) -> Result<Self> {
        Ok(Self {
            dict: Dictionary::new(config)?,
            clock,
            stats: CodecStats::default(),
        })
    }

    /// Encode `input` as one complete stream, preamble included.
    ///
    /// Each call starts from a fresh dictionary and clock at time 0.
    ///
    /// # Algorithm
    ///
    /// 1. Extend the current string while `(current, byte)` is known
    /// 2. In escape mode, announce an unknown byte with an escape and send
    ///    it raw
    /// 3. Otherwise emit the current string, learn `(current, byte)` and
    ///    restart from `byte`
    /// 4. Signal width growth and dictionary pruning in-band so the decoder
    ///    stays in step
    /// 5. Finish with the pending string and the end-of-stream code
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.reset()?;
        let config = *self.dict.config();
        let mut writer = MsbBitWriter::with_output(config.preamble().into_bytes());
        let mut current = EMPTY_CODE;

        for &byte in input {
            if config.escape && self.dict.search_byte(EMPTY_CODE, byte).is_none() {
                self.escape(&mut writer, current, byte)?;
                current = EMPTY_CODE;
            } else if let Some(entry) = self.dict.search_byte(current, byte) {
                current = entry.code;
            } else {
                current = self.extend(&mut writer, current, byte)?;
            }
        }

        if current != EMPTY_CODE {
            self.emit(&mut writer, current)?;
        }
        self.emit(&mut writer, ControlCode::EndOfStream.code())?;

        debug!(
            input = input.len(),
            codes = self.stats.codes,
            prunes = self.stats.prunes,
            escapes = self.stats.escapes,
            entries = self.dict.len(),
            "encoded stream"
        );

        Ok(writer.into_vec())
    }

    /// Send a byte the dictionary does not know yet.
    fn escape(&mut self, writer: &mut MsbBitWriter, current: u32, byte: u8) -> Result<()> {
        if current != EMPTY_CODE {
            self.emit(writer, current)?;
        }
        self.emit(writer, ControlCode::Escape.code())?;
        writer.write_bits(u32::from(byte), RAW_SYMBOL_BITS)?;
        let now = self.clock.tick(&mut self.dict);
        self.stats.escapes += 1;

        match self.dict.insert(EMPTY_CODE, i32::from(byte), now) {
            Insertion::PruneRequired(_) => {
                self.emit(writer, ControlCode::Prune.code())?;
                self.emit(writer, ControlCode::Spacer.code())?;
                self.prune()?;
            }
            Insertion::Exhausted => return Err(self.exhausted()),
            Insertion::Inserted(_)
            | Insertion::WidthGrew(_)
            | Insertion::Present(_)
            | Insertion::Full => {}
        }

        Ok(())
    }

    /// Emit `current`, learn `(current, byte)` and return the next current code.
    fn extend(&mut self, writer: &mut MsbBitWriter, current: u32, byte: u8) -> Result<u32> {
        let single = self.single(byte)?;
        self.emit(writer, current)?;

        match self.dict.insert(current, i32::from(byte), 0) {
            Insertion::PruneRequired(_) => {
                // The byte rides along as the prune payload.
                self.emit(writer, ControlCode::Prune.code())?;
                self.emit(writer, single)?;
                self.prune()?;
                return Ok(EMPTY_CODE);
            }
            Insertion::WidthGrew(code) => {
                let width = self.dict.code_width();
                self.emit_with_width(writer, ControlCode::IncrementWidth.code(), width - 1)?;
                self.stats.width_increments += 1;
                debug!(code, width, "code width grew");
            }
            Insertion::Exhausted => return Err(self.exhausted()),
            Insertion::Inserted(_) | Insertion::Present(_) | Insertion::Full => {}
        }

        Ok(single)
    }

    /// Code of the single-character string `byte`.
    fn single(&self, byte: u8) -> Result<u32> {
        self.dict
            .search_byte(EMPTY_CODE, byte)
            .map(|entry| entry.code)
            .ok_or(LzwError::MissingSymbol {
                time: self.clock.now(),
                symbol: byte,
            })
    }

    fn emit(&mut self, writer: &mut MsbBitWriter, code: u32) -> Result<()> {
        let width = self.dict.code_width();
        self.emit_with_width(writer, code, width)
    }

    /// Write `code`, advance the clock and mark the code as used.
    fn emit_with_width(&mut self, writer: &mut MsbBitWriter, code: u32, width: u8) -> Result<()> {
        writer.write_bits(code, width)?;
        let now = self.clock.tick(&mut self.dict);
        self.dict.touch(code, now);
        self.stats.codes += 1;
        trace!(code, width, now, "emit");
        Ok(())
    }

    fn prune(&mut self) -> Result<()> {
        self.dict = prune(&self.dict, self.clock.now())?;
        self.stats.prunes += 1;
        Ok(())
    }

    fn exhausted(&self) -> LzwError {
        LzwError::DictionaryExhausted {
            time: self.clock.now(),
            entries: self.dict.len(),
        }
    }

    /// Reset the encoder to its initial state.
    pub fn reset(&mut self) -> Result<()> {
        self.dict = Dictionary::new(*self.dict.config())?;
        self.clock.reset();
        self.stats = CodecStats::default();
        Ok(())
    }

    /// Dictionary as left by the last stream.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Counters for the last stream.
    pub fn stats(&self) -> CodecStats {
        self.stats
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzwConfig {
        self.dict.config()
    }
}
