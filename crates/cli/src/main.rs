mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hl7_toolchain_core::{
    LocationPath, Message, ParserConfig, decode_escapes, parse_with_config, to_pretty_json,
};
use hl7_toolchain_diagnostics::{self as diag, Diagnostic};

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "hl7",
    version,
    about = "HL7 toolchain: parse, check, and query pipe-delimited HL7 v2 messages"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG`
    /// overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a message and print its segment tree.
    Parse {
        /// Message file, or `-` for stdin.
        file: String,
        /// Suppress structural warnings.
        #[arg(long)]
        no_lint: bool,
    },

    /// Check that a message parses.
    #[command(alias = "syntax-check")]
    Check {
        /// Message file, or `-` for stdin.
        file: String,
        /// Suppress structural warnings.
        #[arg(long)]
        no_lint: bool,
    },

    /// Print the values at one or more location paths (e.g. PID-5-1, OBX[2]-5).
    Get {
        /// Message file, or `-` for stdin.
        file: String,
        /// Location paths to resolve.
        #[arg(required = true)]
        paths: Vec<String>,
        /// Decode escape sequences (\F\, \S\, \X0D\, ...) in each value.
        #[arg(long)]
        decode: bool,
        /// Suppress structural warnings.
        #[arg(long)]
        no_lint: bool,
    },

    /// List segments in order with their field counts.
    Segments {
        /// Message file, or `-` for stdin.
        file: String,
    },

    /// Explain a diagnostic ID (e.g. HL7-1101).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli.cmd, format) {
        log::debug!("command failed: {err:?}");
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!("{out}");
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}

fn run(cmd: Cmd, format: Format) -> Result<()> {
    match cmd {
        Cmd::Parse { file, no_lint } => cmd_parse(&file, &lint_config(no_lint), format),
        Cmd::Check { file, no_lint } => cmd_check(&file, &lint_config(no_lint), format),
        Cmd::Get {
            file,
            paths,
            decode,
            no_lint,
        } => cmd_get(&file, &paths, decode, &lint_config(no_lint), format),
        Cmd::Segments { file } => cmd_segments(&file, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

/// Install `env_logger`, with `-v` raising the default level above `warn`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn lint_config(no_lint: bool) -> ParserConfig {
    ParserConfig::default().with_lint(!no_lint)
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, config: &ParserConfig, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let (message, diagnostics) = parse_message(&input, config);

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            let out = serde_json::json!({
                "message": message,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Tree to stdout, diagnostics to stderr.
            if let Some(message) = &message {
                println!("{}", to_pretty_json(message));
            }
            render_diagnostics(&input, file, &diagnostics, format);
            print_summary(&diagnostics);
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_check(file: &str, config: &ParserConfig, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let (message, diagnostics) = parse_message(&input, config);
    let ok = message.is_some();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "segments": message.as_ref().map(|m| m.segments().len()),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics(&input, file, &diagnostics, format);
            print_summary(&diagnostics);
            if let Some(message) = &message {
                eprintln!("syntax ok ({} segments)", message.segments().len());
            }
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_get(
    file: &str,
    raw_paths: &[String],
    decode: bool,
    config: &ParserConfig,
    format: Format,
) -> Result<()> {
    // Reject bad paths before touching the input.
    let paths = raw_paths
        .iter()
        .map(|p| {
            p.parse::<LocationPath>()
                .with_context(|| format!("invalid location path '{p}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let input = read_input(file)?;
    let (message, diagnostics) = parse_message(&input, config);
    let Some(message) = message else {
        render_diagnostics(&input, file, &diagnostics, format);
        print_summary(&diagnostics);
        process::exit(1);
    };
    if format == Format::Pretty {
        render_diagnostics(&input, file, &diagnostics, format);
    }

    let mut values = Vec::with_capacity(paths.len());
    for path in &paths {
        let value = match message.query(path) {
            Some(raw) if decode => Some(decode_value(raw, path, &message)?),
            Some(raw) => Some(raw.to_string()),
            None => None,
        };
        log::debug!("{path} -> {value:?}");
        values.push((path, value));
    }

    match format {
        Format::Json => {
            let results: Vec<_> = values
                .iter()
                .map(|(path, value)| {
                    serde_json::json!({ "path": path.to_string(), "value": value })
                })
                .collect();
            let out = serde_json::json!({
                "results": results,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for (path, value) in &values {
                match value {
                    Some(v) => println!("{path}\t{v}"),
                    None => println!("{path}\t(absent)"),
                }
            }
        }
    }
    Ok(())
}

fn cmd_segments(file: &str, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let (message, diagnostics) = parse_message(&input, &ParserConfig::default().with_lint(false));
    let Some(message) = message else {
        render_diagnostics(&input, file, &diagnostics, format);
        process::exit(1);
    };

    match format {
        Format::Json => {
            let rows: Vec<_> = message
                .segments()
                .iter()
                .map(|s| serde_json::json!({ "name": s.name(), "fields": s.fields().len() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Format::Pretty => {
            for (i, segment) in message.segments().iter().enumerate() {
                println!(
                    "{:>3}  {:<4} {} fields",
                    i + 1,
                    segment.name(),
                    segment.fields().len()
                );
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the command output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read a message from a file path, or from stdin when the path is `-`.
fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read message from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
}

/// Parse, folding a fatal error into the diagnostic list.
fn parse_message(input: &str, config: &ParserConfig) -> (Option<Message>, Vec<Diagnostic>) {
    match parse_with_config(input, config) {
        Ok(res) => (Some(res.message), res.diagnostics),
        Err(err) => (None, vec![err.to_diagnostic()]),
    }
}

fn decode_value(raw: &str, path: &LocationPath, message: &Message) -> Result<String> {
    decode_escapes(raw, message.delimiters()).or_else(|errors| {
        let details: Vec<String> = errors
            .iter()
            .map(|e| format!("offset {}: {}", e.offset, e.message))
            .collect();
        bail!("cannot decode {path}: {}", details.join("; "))
    })
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}
