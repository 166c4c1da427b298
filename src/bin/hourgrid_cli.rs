//! CLI tool for hourgrid - projects the sample man-hour sheet and outputs JSON
//!
//! Usage:
//!   hourgrid_cli                                   # Grid JSON to stdout
//!   hourgrid_cli --config cfg.json                 # With a grid config
//!   hourgrid_cli --changes batch.json              # Apply a change batch first
//!   hourgrid_cli --changes batch.json -o out.json  # Grid JSON to file
//!
//! Edit outcomes are printed to stderr. `RUST_LOG` controls log output
//! (default `hourgrid=info`).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use hourgrid::config::GridConfig;
use hourgrid::editor::ManHourEditor;
use hourgrid::source::JsonSource;
use hourgrid::types::RawCellChange;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: hourgrid_cli [--config cfg.json] [--changes batch.json] [-o output.json]";

#[derive(Default)]
struct Args {
    config: Option<String>,
    changes: Option<String>,
    output: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        let slot = match flag.as_str() {
            "--config" => &mut args.config,
            "--changes" => &mut args.changes,
            "-o" => &mut args.output,
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("{USAGE}");
                std::process::exit(1);
            }
        };
        match iter.next() {
            Some(value) => *slot = Some(value),
            None => {
                eprintln!("Missing value for {flag}");
                std::process::exit(1);
            }
        }
    }
    args
}

fn read(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hourgrid=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args();

    let config = match args.config.as_deref().map(read) {
        Some(json) => match GridConfig::from_json(&json) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            }
        },
        None => GridConfig::default(),
    };

    // Load the built-in sheet
    let state = match futures::executor::block_on(JsonSource::fixture().load()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading sheet: {}", e);
            std::process::exit(1);
        }
    };
    let mut editor = ManHourEditor::with_state(state, config);

    // Apply changes
    if let Some(path) = args.changes.as_deref() {
        let changes: Vec<RawCellChange> = match serde_json::from_str(&read(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error parsing changes: {}", e);
                std::process::exit(1);
            }
        };
        for (i, outcome) in editor.handle_raw_changes(changes).iter().enumerate() {
            eprintln!("edit {i}: {}", serde_json::to_string(outcome).unwrap());
        }
    }

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&editor.grid()) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
