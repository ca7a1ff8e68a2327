//! Windowed dictionary pruning.
//!
//! Pruning never deletes entries in place. It builds a fresh dictionary
//! from the strings that were used within the window, re-inserting each one
//! character by character so every prefix of a survivor survives too. The
//! old entries are visited in code order, which makes the rebuild a pure
//! function of `(old dictionary, now)`: the encoder and the decoder reach the
//! same dictionary without exchanging it.

use crate::control::EMPTY_CODE;
use crate::dictionary::{Dictionary, Entry, Insertion};
use crate::error::{LzwError, Result};
use tracing::debug;

/// Whether `entry` survives a prune at `now` with the given window.
#[inline]
pub fn is_recent(entry: &Entry, now: i64, window: i64) -> bool {
    entry.last_use != 0 && now - window < entry.last_use
}

/// Rebuild `old`, keeping only strings used within its window.
pub fn prune(old: &Dictionary, now: i64) -> Result<Dictionary> {
    let mut fresh = Dictionary::new(*old.config())?;
    let window = old.config().window;
    let mut string = Vec::new();

    for entry in old.entries() {
        if !is_recent(entry, now, window) {
            continue;
        }

        if entry.is_control() {
            // Control entries are always present; only their stamp carries over.
            fresh.touch(entry.code, entry.last_use);
            continue;
        }

        if !old.spell(entry.code, &mut string) {
            return Err(LzwError::violation(
                now,
                format!("code {} has a broken prefix chain", entry.code),
            ));
        }

        let mut prefix = EMPTY_CODE;
        for &byte in &string {
            if let Some(found) = fresh.search_byte(prefix, byte) {
                prefix = found.code;
                continue;
            }

            match fresh.insert(prefix, i32::from(byte), 0) {
                Insertion::Inserted(code)
                | Insertion::WidthGrew(code)
                | Insertion::PruneRequired(code)
                | Insertion::Present(code) => prefix = code,
                // Stamp the longest prefix that made it in.
                Insertion::Full => break,
                Insertion::Exhausted => {
                    return Err(LzwError::DictionaryExhausted {
                        time: now,
                        entries: fresh.len(),
                    });
                }
            }
        }

        fresh.touch(prefix, entry.last_use);
    }

    debug!(
        now,
        before = old.len(),
        after = fresh.len(),
        width = fresh.code_width(),
        "pruned dictionary"
    );

    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LzwConfig;
    use crate::control::{CONTROL_CODES, ControlCode};
    use std::collections::BTreeSet;

    fn insert_string(dict: &mut Dictionary, bytes: &[u8]) -> u32 {
        let mut prefix = EMPTY_CODE;
        for &byte in bytes {
            prefix = match dict.search_byte(prefix, byte) {
                Some(entry) => entry.code,
                None => dict.insert(prefix, i32::from(byte), 0).code().unwrap(),
            };
        }
        prefix
    }

    fn find_string(dict: &Dictionary, bytes: &[u8]) -> Option<u32> {
        let mut prefix = EMPTY_CODE;
        for &byte in bytes {
            prefix = dict.search_byte(prefix, byte)?.code;
        }
        Some(prefix)
    }

    fn strings_of(dict: &Dictionary) -> BTreeSet<Vec<u8>> {
        let mut out = BTreeSet::new();
        let mut buf = Vec::new();
        for entry in dict.entries() {
            if !entry.is_control() {
                assert!(dict.spell(entry.code, &mut buf));
                out.insert(buf.clone());
            }
        }
        out
    }

    #[test]
    fn test_prune_keeps_recent_strings_and_their_prefixes() {
        let config = LzwConfig::new(9).with_window(10);
        let mut dict = Dictionary::new(config).unwrap();

        let abc = insert_string(&mut dict, b"abc");
        let xyz = insert_string(&mut dict, b"xyz");
        let ab = insert_string(&mut dict, b"ab");
        dict.touch(abc, 95);
        dict.touch(xyz, 50);

        let pruned = prune(&dict, 100).unwrap();

        let strings = strings_of(&pruned);
        assert!(strings.contains(&b"abc".to_vec()));
        assert!(strings.contains(&b"ab".to_vec()));
        assert!(!strings.contains(&b"xyz".to_vec()));
        assert!(!strings.contains(&b"xy".to_vec()));

        // 6 controls + 256 singles + "ab" + "abc".
        assert_eq!(pruned.len(), 264);
        let new_abc = pruned.lookup(find_string(&pruned, b"abc").unwrap()).unwrap();
        assert_eq!(new_abc.last_use, 95);
        let new_ab = pruned.lookup(new_abc.prefix).unwrap();
        assert_eq!(new_ab.last_use, 0);
        assert_eq!(dict.lookup(ab).unwrap().last_use, 0);
    }

    #[test]
    fn test_prune_window_boundary() {
        let config = LzwConfig::new(9).with_window(10);
        let mut dict = Dictionary::new(config).unwrap();
        let inside = insert_string(&mut dict, b"in");
        let edge = insert_string(&mut dict, b"ed");
        dict.touch(inside, 91);
        dict.touch(edge, 90);

        let pruned = prune(&dict, 100).unwrap();
        let strings = strings_of(&pruned);
        assert!(strings.contains(&b"in".to_vec()));
        assert!(!strings.contains(&b"ed".to_vec()));
    }

    #[test]
    fn test_prune_escape_mode_drops_stale_singles() {
        let config = LzwConfig::new(9).with_window(5).with_escape(true);
        let mut dict = Dictionary::new(config).unwrap();
        let _ = dict.insert(EMPTY_CODE, i32::from(b'q'), 3);
        let _ = dict.insert(EMPTY_CODE, i32::from(b'r'), 9);
        dict.touch(ControlCode::Escape.code(), 8);

        let pruned = prune(&dict, 10).unwrap();
        assert_eq!(pruned.len(), CONTROL_CODES as usize + 1);
        assert!(pruned.search_byte(EMPTY_CODE, b'q').is_none());
        assert_eq!(pruned.search_byte(EMPTY_CODE, b'r').unwrap().last_use, 9);
        assert_eq!(pruned.lookup(ControlCode::Escape.code()).unwrap().last_use, 8);
        assert_eq!(pruned.code_width(), 3);
    }

    #[test]
    fn test_prune_is_deterministic() {
        let config = LzwConfig::new(10).with_window(40);
        let mut dict = Dictionary::new(config).unwrap();
        for (i, word) in [&b"banana"[..], b"bandana", b"cabana", b"nab", b"ananas"]
            .iter()
            .enumerate()
        {
            let code = insert_string(&mut dict, word);
            dict.touch(code, 60 + i as i64 * 7);
        }

        let first = prune(&dict, 100).unwrap();
        let second = prune(&dict, 100).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_prune_count_matches_independent_rule() {
        let config = LzwConfig::new(10).with_window(25);
        let mut dict = Dictionary::new(config).unwrap();
        let words: [&[u8]; 6] = [b"alpha", b"alps", b"beta", b"bet", b"gamma", b"gam"];
        for (i, word) in words.iter().enumerate() {
            let code = insert_string(&mut dict, word);
            dict.touch(code, 70 + i as i64 * 5);
        }

        let now = 100;
        let mut expected: BTreeSet<Vec<u8>> = (0..=u8::MAX).map(|b| vec![b]).collect();
        let mut buf = Vec::new();
        for entry in dict.entries() {
            if !entry.is_control() && is_recent(entry, now, 25) {
                assert!(dict.spell(entry.code, &mut buf));
                for end in 1..=buf.len() {
                    expected.insert(buf[..end].to_vec());
                }
            }
        }

        let pruned = prune(&dict, now).unwrap();
        assert_eq!(pruned.len(), CONTROL_CODES as usize + expected.len());
        assert_eq!(strings_of(&pruned), expected);
    }

    #[test]
    fn test_prune_resets_width_to_minimum() {
        let config = LzwConfig::new(10).with_window(5);
        let mut dict = Dictionary::new(config).unwrap();
        for i in 0..300u32 {
            let _ = dict.insert(6 + i % 256, (i / 256) as i32 + 1, 0);
        }
        assert_eq!(dict.code_width(), 10);

        let pruned = prune(&dict, 1000).unwrap();
        assert_eq!(pruned.len(), 262);
        assert_eq!(pruned.code_width(), 9);
    }
}
