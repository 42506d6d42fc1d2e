//! Lightweight parse/query/dump benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p hl7_toolchain_core --example parse_benchmark --release`
//!
//! `HL7_BENCH_ITERS` overrides the iteration count (default 2000).

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use hl7_toolchain_core::{LocationPath, parse_str, to_pretty_json};

const QUERIES: &[&str] = &["MSH-9", "PID-3", "PID-5-2", "PID-13(2)", "OBX[2]-5"];

fn report(name: &str, elapsed: Duration, iterations: usize) {
    println!(
        "  {name:<6} total={elapsed:?}, per_iter={:.4} ms",
        elapsed.as_secs_f64() * 1000.0 / iterations as f64
    );
}

fn run_benchmark(label: &str, input: &str, iterations: usize) -> Result<(), String> {
    let paths = QUERIES
        .iter()
        .map(|p| p.parse::<LocationPath>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = parse_str(input);
    }
    let parse_elapsed = parse_start.elapsed();

    let parsed = parse_str(input).map_err(|e| format!("{label}: {e}"))?;

    let query_start = Instant::now();
    let mut hits = 0usize;
    for _ in 0..iterations {
        hits += paths
            .iter()
            .filter(|p| parsed.message.query(p).is_some())
            .count();
    }
    let query_elapsed = query_start.elapsed();

    let dump_start = Instant::now();
    for _ in 0..iterations {
        let _ = to_pretty_json(&parsed.message);
    }
    let dump_elapsed = dump_start.elapsed();

    println!("Benchmark: {label}");
    println!(
        "  input_bytes: {}, segments: {}, query_hits/iter: {}",
        input.len(),
        parsed.message.segments().len(),
        hits / iterations
    );
    report("parse", parse_elapsed, iterations);
    report("query", query_elapsed, iterations);
    report("dump", dump_elapsed, iterations);
    Ok(())
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("HL7_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(2000);

    let samples = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples");
    for name in ["adt_a01.hl7", "oru_r01.hl7"] {
        let path = samples.join(name);
        let input = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read sample '{}': {e}", path.display()))?;
        run_benchmark(name, &input, iterations)?;
    }

    Ok(())
}
