//! Shared test helpers for `hl7_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use std::path::PathBuf;

use hl7_toolchain_core::grammar::parser::{ParseResult, parse_str};
use hl7_toolchain_core::{Component, Field, Message};

/// Minimal ADT message from the original test suite.
#[allow(dead_code)]
pub const BASIC_ADT: &str = "MSH|^~\\&|EPIC|FAC1|CERNER|FAC2|20231115||ADT^A01|MSG001|P|2.5\n\
                             PID|1||12345^^^MRN||Doe^John||19800115|M";

/// ADT message whose PID-13 repeats.
#[allow(dead_code)]
pub const REPEATING_PHONE: &str = "MSH|^~\\&|APP|||FAC|20231115||ADT^A01|1|P|2.5\n\
                                   PID|1||123||Doe^John||19800115|M|||123 Main||555-1234~555-5678";

/// Route `log` output through the test harness. Safe to call repeatedly.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse input that is expected to succeed.
#[allow(dead_code)]
pub fn parse_ok(input: &str) -> ParseResult {
    init_logging();
    parse_str(input).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
}

/// Segment names in order.
#[allow(dead_code)]
pub fn segment_names(message: &Message) -> Vec<&str> {
    message.segments().iter().map(|s| s.name()).collect()
}

/// Every leaf of a field as nested string vectors.
#[allow(dead_code)]
pub fn leaves(field: &Field) -> Vec<Vec<Vec<String>>> {
    field
        .repetitions()
        .iter()
        .map(|r| {
            r.components()
                .iter()
                .map(|c: &Component| c.subcomponents().to_vec())
                .collect()
        })
        .collect()
}

/// Collect diagnostic codes from a parse result.
#[allow(dead_code)]
pub fn extract_diag_codes(result: &ParseResult) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}

/// Directory holding `.hl7` sample messages.
#[allow(dead_code)]
pub fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples")
}
