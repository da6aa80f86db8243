//! `ui-stream-replay`: rebuild a UI tree from a recorded patch stream.
//!
//! Usage:
//!   ui-stream-replay [--previous <tree.json>] [--max-line-len <bytes>] < patches.jsonl
//!
//! The JSON Lines patch stream is read from stdin; the final tree is printed
//! to stdout as JSON.

use std::io::{self, Write};

use ui_stream::cli::{parse_args, parse_tree, replay, CliError, ReplayOptions};
use ui_stream::patch::DecoderOptions;

fn run() -> Result<(), CliError> {
    let args = parse_args(std::env::args().skip(1))?;
    let previous = match &args.previous {
        Some(path) => Some(parse_tree(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let options = ReplayOptions {
        previous,
        decoder: DecoderOptions {
            max_line_len: args.max_line_len,
            ..DecoderOptions::default()
        },
    };

    let tree = replay(io::stdin().lock(), &options)?;
    let out = serde_json::to_string_pretty(&tree.to_json())?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
