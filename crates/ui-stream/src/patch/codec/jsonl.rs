//! Streaming JSON Lines decoder.
//!
//! Fragments are buffered as raw bytes and split on `\n`; a line is only
//! decoded once it is complete, so neither line breaks nor multi-byte UTF-8
//! sequences care where the fragment boundaries fall. The patches produced
//! for a given byte sequence are the same however it is chunked.
//!
//! Blank lines and comment lines are skipped. Lines that are not valid
//! UTF-8, not valid JSON, or not shaped like a patch are dropped without
//! interrupting the stream.

use crate::patch::codec::json::from_json_str;
use crate::patch::types::Patch;

#[derive(Debug, Clone, PartialEq)]
pub struct DecoderOptions {
    /// Lines starting with this prefix (after trimming) are ignored.
    /// An empty prefix disables comment handling.
    pub comment_prefix: String,
    /// Lines longer than this many bytes are dropped.
    pub max_line_len: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            comment_prefix: "//".to_string(),
            max_line_len: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PatchDecoder {
    options: DecoderOptions,
    buffer: Vec<u8>,
    /// Set while discarding the tail of an over-long line.
    skipping: bool,
}

impl PatchDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        PatchDecoder {
            options,
            buffer: Vec::new(),
            skipping: false,
        }
    }

    /// Bytes held back waiting for a line break.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Feed one fragment; returns the patches from every line it completes.
    pub fn push(&mut self, fragment: &[u8]) -> Vec<Patch> {
        let mut out = Vec::new();
        let mut rest = fragment;
        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            if self.skipping {
                self.skipping = false;
            } else {
                self.buffer.extend_from_slice(&rest[..pos]);
                if !self.over_limit() {
                    out.extend(self.decode_line(&self.buffer));
                }
            }
            self.buffer.clear();
            rest = &rest[pos + 1..];
        }
        if !self.skipping {
            self.buffer.extend_from_slice(rest);
            if self.over_limit() {
                tracing::trace!(len = self.buffer.len(), "dropping over-long patch line");
                self.buffer.clear();
                self.skipping = true;
            }
        }
        out
    }

    /// Flush the final line of a stream that did not end with a line break.
    pub fn finish(&mut self) -> Vec<Patch> {
        let line = std::mem::take(&mut self.buffer);
        if std::mem::take(&mut self.skipping) {
            return Vec::new();
        }
        self.decode_line(&line).into_iter().collect()
    }

    fn over_limit(&self) -> bool {
        self.options
            .max_line_len
            .is_some_and(|max| self.buffer.len() > max)
    }

    fn decode_line(&self, raw: &[u8]) -> Option<Patch> {
        let Ok(text) = std::str::from_utf8(raw) else {
            tracing::trace!(len = raw.len(), "dropping non-UTF-8 patch line");
            return None;
        };
        let line = text.trim();
        if line.is_empty() {
            return None;
        }
        let prefix = self.options.comment_prefix.as_str();
        if !prefix.is_empty() && line.starts_with(prefix) {
            return None;
        }
        match from_json_str(line) {
            Ok(patch) => Some(patch),
            Err(err) => {
                tracing::trace!(error = %err, "dropping undecodable patch line");
                None
            }
        }
    }
}

/// Decode a complete byte sequence, including an unterminated last line.
pub fn decode_all(bytes: &[u8]) -> Vec<Patch> {
    let mut decoder = PatchDecoder::default();
    let mut patches = decoder.push(bytes);
    patches.extend(decoder.finish());
    patches
}
