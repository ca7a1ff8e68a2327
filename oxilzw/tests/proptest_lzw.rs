//! Property-based round-trip and robustness checks.

use oxilzw::{LzwConfig, LzwDecoder, LzwEncoder, decompress};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = LzwConfig> {
    (9u8..=12, prop_oneof![Just(0i64), 1i64..500], any::<bool>()).prop_map(
        |(max_bits, window, escape)| {
            LzwConfig::new(max_bits)
                .with_window(window)
                .with_escape(escape)
        },
    )
}

proptest! {
    #[test]
    fn prop_roundtrip_arbitrary_bytes(
        data in prop::collection::vec(any::<u8>(), 0..2000),
        config in config_strategy(),
    ) {
        let mut encoder = LzwEncoder::new(config).unwrap();
        let compressed = encoder.encode(&data).unwrap();

        let mut decoder = LzwDecoder::new();
        let decompressed = decoder.decode(&compressed).unwrap();
        prop_assert_eq!(&decompressed, &data);
        prop_assert_eq!(decoder.dictionary(), Some(encoder.dictionary()));
    }

    // Small alphabets produce long strings, KwK codes and frequent prunes.
    #[test]
    fn prop_roundtrip_small_alphabet(
        data in prop::collection::vec(0u8..4, 0..6000),
        config in config_strategy(),
    ) {
        let mut encoder = LzwEncoder::new(config).unwrap();
        let compressed = encoder.encode(&data).unwrap();
        prop_assert!(compressed.starts_with(config.preamble().as_bytes()));

        let mut decoder = LzwDecoder::new();
        prop_assert_eq!(decoder.decode(&compressed).unwrap(), data);
        prop_assert_eq!(decoder.stats(), encoder.stats());
    }

    #[test]
    fn prop_encoding_is_deterministic(
        data in prop::collection::vec(any::<u8>(), 0..1000),
        config in config_strategy(),
    ) {
        let first = LzwEncoder::new(config).unwrap().encode(&data).unwrap();
        let second = LzwEncoder::new(config).unwrap().encode(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    // Garbage after a valid preamble must fail cleanly or decode, never panic.
    #[test]
    fn prop_garbage_never_panics(
        body in prop::collection::vec(any::<u8>(), 0..300),
        escape in any::<bool>(),
        window in 0i64..40,
    ) {
        let mut stream = LzwConfig::new(9)
            .with_window(window)
            .with_escape(escape)
            .preamble()
            .into_bytes();
        stream.extend_from_slice(&body);
        let _ = decompress(&stream);
    }
}
