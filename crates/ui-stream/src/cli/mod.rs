//! Core logic of the `ui-stream-replay` binary.
//!
//! Replays a recorded JSON Lines patch stream and returns the tree it
//! builds, optionally on top of a previous tree.

use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::patch::{apply_op, DecoderOptions, PatchDecoder};
use crate::tree::{Tree, TreeError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Tree(#[from] TreeError),
    #[error("usage: {0}")]
    Usage(String),
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub previous: Option<Tree>,
    pub decoder: DecoderOptions,
}

/// Command-line arguments of the replay binary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayArgs {
    pub previous: Option<PathBuf>,
    pub max_line_len: Option<usize>,
}

const CHUNK: usize = 8 * 1024;

/// Decode and apply every patch read from `input`.
pub fn replay<R: Read>(mut input: R, options: &ReplayOptions) -> Result<Tree, CliError> {
    let mut tree = options.previous.as_ref().map(Tree::seeded_from).unwrap_or_default();
    let mut decoder = PatchDecoder::new(options.decoder.clone());
    let mut buf = vec![0u8; CHUNK];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for patch in decoder.push(&buf[..n]) {
            apply_op(&mut tree, &patch);
        }
    }
    for patch in decoder.finish() {
        apply_op(&mut tree, &patch);
    }
    Ok(tree)
}

/// Parse a tree document such as one printed by a previous replay.
pub fn parse_tree(json: &str) -> Result<Tree, CliError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(Tree::from_json(&value)?)
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<ReplayArgs, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = ReplayArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--previous" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--previous needs a file".into()))?;
                out.previous = Some(PathBuf::from(path));
            }
            "--max-line-len" => {
                let n = args
                    .next()
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| CliError::Usage("--max-line-len needs a byte count".into()))?;
                out.max_line_len = Some(n);
            }
            other => return Err(CliError::Usage(format!("unknown argument {other}"))),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replays_stream() {
        let input = b"{\"op\":\"set\",\"path\":\"/root\",\"value\":\"a\"}\n\
            // comment\n\
            {\"op\":\"add\",\"path\":\"/elements/a\",\"value\":{\"key\":\"a\",\"type\":\"Text\",\"props\":{}}}";
        let tree = replay(&input[..], &ReplayOptions::default()).unwrap();
        assert_eq!(tree.root, "a");
        assert_eq!(tree.get("a").unwrap().element_type(), Some("Text"));
    }

    #[test]
    fn replays_on_previous() {
        let previous = parse_tree(r#"{"root":"a","elements":{"a":{"key":"a","type":"Card","props":{}}}}"#).unwrap();
        let options = ReplayOptions {
            previous: Some(previous),
            ..ReplayOptions::default()
        };
        let input = br#"{"op":"set","path":"/elements/a/props/title","value":"T"}"#;
        let tree = replay(&input[..], &options).unwrap();
        assert_eq!(tree.get("a").unwrap().prop("title"), Some(&json!("T")));
    }

    #[test]
    fn args() {
        let args = parse_args(["--previous", "t.json", "--max-line-len", "100"].map(String::from)).unwrap();
        assert_eq!(args.previous, Some(PathBuf::from("t.json")));
        assert_eq!(args.max_line_len, Some(100));
        assert!(parse_args(["--max-line-len".to_string(), "x".to_string()]).is_err());
        assert!(parse_args(["--bogus".to_string()]).is_err());
        assert!(parse_args(["--previous".to_string()]).is_err());
    }

    #[test]
    fn bad_previous_tree() {
        assert!(matches!(parse_tree("{"), Err(CliError::Json(_))));
        assert!(matches!(parse_tree(r#"{"root":1}"#), Err(CliError::Tree(_))));
    }
}
