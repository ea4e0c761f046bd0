//! Fuzz target for the dataset loaders.
//!
//! This fuzzer tests that the JSON, JSON lines and delimited parsers:
//! 1. Never panic on malformed input
//! 2. Handle all delimiter combinations
//! 3. Don't allocate unbounded memory

#![no_main]

use datacard::{Loader, LoaderConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let loader = Loader::with_config(LoaderConfig {
        max_records: Some(1_000),
        ..Default::default()
    });

    let _ = loader.parse_json(data);
    let _ = loader.parse_json_lines(data);
    for delimiter in [b',', b'\t', b';', b'|'] {
        let _ = loader.parse_delimited(data, delimiter);
    }
});
