//! LZW decoder (decompression).
//!
//! The decoder replays the encoder's dictionary updates one code late: the
//! string learned after sending code `w` needs the first character of the
//! code that follows, so it is inserted when that next code arrives. When
//! the next code is the very entry still being learned (the `KwK` case), its
//! string is the previous string plus the previous string's first character.

use crate::bitstream_msb::MsbBitReader;
use crate::clock::Clock;
use crate::config::LzwConfig;
use crate::control::{ControlCode, EMPTY_CODE, RAW_SYMBOL_BITS};
use crate::dictionary::{Dictionary, Insertion};
use crate::error::{LzwError, Result};
use crate::prune::prune;
use crate::stats::CodecStats;
use tracing::{debug, trace};

/// LZW decoder for decompression.
#[derive(Debug, Default)]
pub struct LzwDecoder {
    /// Dictionary of the last stream, once its preamble was read.
    dict: Option<Dictionary>,
    /// Logical clock, ticking once per code or raw byte read.
    clock: Clock,
    /// Stack for string expansion.
    stack: Vec<u8>,
    /// Counters for the last stream.
    stats: CodecStats,
}

impl LzwDecoder {
    /// Create a new LZW decoder.
    ///
    /// Every parameter comes from the stream preamble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder whose clock uses custom rebase limits.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    /// Decode one complete stream, preamble included.
    pub fn decode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let (config, consumed) = LzwConfig::parse_preamble(input)?;
        let mut dict = Dictionary::new(config)?;
        self.clock.reset();
        self.stats = CodecStats::default();

        let result = self.run(&mut dict, &input[consumed..]);
        self.dict = Some(dict);
        let output = result?;

        debug!(
            output = output.len(),
            codes = self.stats.codes,
            prunes = self.stats.prunes,
            escapes = self.stats.escapes,
            "decoded stream"
        );

        Ok(output)
    }

    fn run(&mut self, dict: &mut Dictionary, body: &[u8]) -> Result<Vec<u8>> {
        let mut reader = MsbBitReader::new(body);
        let mut output = Vec::with_capacity(body.len() * 2);
        let mut previous: Option<u32> = None;

        loop {
            let width = dict.code_width();
            let code = self.read(&mut reader, width, "expected a code")?;
            let now = self.clock.tick(dict);
            self.stats.codes += 1;
            trace!(code, width, now, "read");

            match ControlCode::from_code(code) {
                Some(ControlCode::EndOfStream) => {
                    dict.touch(code, now);
                    break;
                }
                Some(ControlCode::Empty) | Some(ControlCode::Spacer) => {
                    return Err(LzwError::violation(
                        now,
                        format!("unexpected control code {}", code),
                    ));
                }
                Some(ControlCode::IncrementWidth) => {
                    dict.touch(code, now);
                    if !dict.grow_width() {
                        return Err(LzwError::violation(
                            now,
                            format!("code width increment past {} bits", dict.config().max_bits),
                        ));
                    }
                    self.stats.width_increments += 1;
                }
                Some(ControlCode::Prune) => {
                    self.prune(dict, &mut reader, &mut output, code, now)?;
                    previous = None;
                }
                Some(ControlCode::Escape) => {
                    self.escape(dict, &mut reader, &mut output, code, now)?;
                    previous = None;
                }
                None => {
                    self.string(dict, &mut output, previous, code, now)?;
                    previous = Some(code);
                }
            }
        }

        Ok(output)
    }

    fn read(
        &self,
        reader: &mut MsbBitReader<'_>,
        width: u8,
        context: &'static str,
    ) -> Result<u32> {
        reader
            .read_bits(width)?
            .ok_or_else(|| LzwError::truncated(self.clock.now(), context))
    }

    /// Handle a prune request and its payload.
    fn prune(
        &mut self,
        dict: &mut Dictionary,
        reader: &mut MsbBitReader<'_>,
        output: &mut Vec<u8>,
        code: u32,
        now: i64,
    ) -> Result<()> {
        if !dict.config().pruning_enabled() {
            return Err(LzwError::violation(now, "prune request with pruning disabled"));
        }
        dict.touch(code, now);

        let payload = self.read(reader, dict.code_width(), "expected a prune payload")?;
        let now = self.clock.tick(dict);
        self.stats.codes += 1;

        if payload != ControlCode::Spacer.code() {
            let byte = dict
                .lookup(payload)
                .filter(|entry| entry.prefix == EMPTY_CODE)
                .and_then(|entry| entry.byte())
                .ok_or_else(|| {
                    LzwError::violation(
                        now,
                        format!("prune payload {} is not a single character", payload),
                    )
                })?;
            output.push(byte);
        }
        dict.touch(payload, now);

        *dict = prune(dict, now)?;
        self.stats.prunes += 1;
        Ok(())
    }

    /// Handle an escape and learn its raw byte.
    fn escape(
        &mut self,
        dict: &mut Dictionary,
        reader: &mut MsbBitReader<'_>,
        output: &mut Vec<u8>,
        code: u32,
        now: i64,
    ) -> Result<()> {
        if !dict.config().escape {
            return Err(LzwError::violation(now, "escape with escape mode disabled"));
        }
        dict.touch(code, now);

        let raw = self.read(reader, RAW_SYMBOL_BITS, "expected an escaped byte")?;
        let now = self.clock.tick(dict);
        let byte = raw as u8;
        output.push(byte);
        self.stats.escapes += 1;

        // A full code space here is followed by an explicit prune request.
        match dict.insert(EMPTY_CODE, i32::from(byte), now) {
            Insertion::Inserted(_)
            | Insertion::WidthGrew(_)
            | Insertion::PruneRequired(_)
            | Insertion::Full => Ok(()),
            Insertion::Present(_) => Err(LzwError::violation(
                now,
                format!("escaped byte {:#04x} is already known", byte),
            )),
            Insertion::Exhausted => Err(LzwError::DictionaryExhausted {
                time: now,
                entries: dict.len(),
            }),
        }
    }

    /// Output the string of an ordinary code and learn the pending entry.
    fn string(
        &mut self,
        dict: &mut Dictionary,
        output: &mut Vec<u8>,
        previous: Option<u32>,
        code: u32,
        now: i64,
    ) -> Result<()> {
        if code < dict.next_code() {
            let root = dict.expand(code, &mut self.stack).ok_or_else(|| {
                LzwError::violation(now, format!("code {} has no string", code))
            })?;
            output.push(root);
            output.extend(self.stack.iter().rev());

            if let Some(prefix) = previous {
                learn(dict, prefix, root, now)?;
            }
        } else if code == dict.next_code() {
            // KwK: the code is the entry being learned right now.
            let prefix = previous.ok_or_else(|| {
                LzwError::violation(now, format!("code {} used before it was defined", code))
            })?;
            let root = dict.expand(prefix, &mut self.stack).ok_or_else(|| {
                LzwError::violation(now, format!("code {} has no string", prefix))
            })?;
            output.push(root);
            output.extend(self.stack.iter().rev());
            output.push(root);

            if learn(dict, prefix, root, now)? != Some(code) {
                return Err(LzwError::violation(
                    now,
                    format!("code {} could not be learned", code),
                ));
            }
        } else {
            return Err(LzwError::violation(
                now,
                format!("code {} beyond next code {}", code, dict.next_code()),
            ));
        }

        dict.touch(code, now);
        Ok(())
    }

    /// Dictionary of the last stream, if its preamble was valid.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dict.as_ref()
    }

    /// Counters for the last stream.
    pub fn stats(&self) -> CodecStats {
        self.stats
    }
}

/// Insert the entry the encoder learned one code earlier.
///
/// Returns the new code, or `None` if the code space was already full.
fn learn(dict: &mut Dictionary, prefix: u32, root: u8, now: i64) -> Result<Option<u32>> {
    match dict.insert(prefix, i32::from(root), 0) {
        Insertion::Inserted(code) | Insertion::Present(code) => Ok(Some(code)),
        Insertion::Full => Ok(None),
        Insertion::WidthGrew(code) => Err(LzwError::violation(
            now,
            format!("code {} needs a wider code without an increment", code),
        )),
        Insertion::PruneRequired(code) => Err(LzwError::violation(
            now,
            format!("code {} fills the dictionary without a prune request", code),
        )),
        Insertion::Exhausted => Err(LzwError::DictionaryExhausted {
            time: now,
            entries: dict.len(),
        }),
    }
}
