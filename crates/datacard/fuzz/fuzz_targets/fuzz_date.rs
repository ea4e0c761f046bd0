//! Fuzz target for timestamp parsing and temporal inference.
//!
//! This fuzzer tests that:
//! 1. The timestamp parser never panics on any string
//! 2. Regex-based shape detection doesn't crash on pathological input
//! 3. A field of fuzzed values survives schema inference and analysis

#![no_main]

use datacard::input::{format_timestamp, parse_timestamp};
use datacard::{DataCardGenerator, Dataset, Record, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(ts) = parse_timestamp(content) {
        let _ = format_timestamp(&ts);
    }

    // Same value in several records, so the field is probed as a date column
    let records: Vec<Record> = (0..3)
        .map(|_| {
            let mut record = Record::new();
            record.insert("when".to_string(), Value::from(content));
            record
        })
        .collect();
    let _ = DataCardGenerator::new().analyze(&Dataset::new(records));
});
