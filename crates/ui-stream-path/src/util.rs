use crate::types::Path;

/// Unescapes a pointer segment.
///
/// `~1` becomes `/` and `~0` becomes `~`.
///
/// ```
/// use ui_stream_path::unescape_segment;
///
/// assert_eq!(unescape_segment("a~0b"), "a~b");
/// assert_eq!(unescape_segment("c~1d"), "c/d");
/// ```
pub fn unescape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek().copied()) {
            ('~', Some('0')) => {
                out.push('~');
                chars.next();
            }
            ('~', Some('1')) => {
                out.push('/');
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a pointer segment.
///
/// ```
/// use ui_stream_path::escape_segment;
///
/// assert_eq!(escape_segment("a~b"), "a~0b");
/// assert_eq!(escape_segment("c/d"), "c~1d");
/// ```
pub fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            _ => out.push(c),
        }
    }
    out
}

/// Parses a pointer-style path into its unescaped segments.
///
/// The empty string is the root (no segments). The leading `/` is stripped;
/// a pointer without one is read as if it had it.
///
/// ```
/// use ui_stream_path::parse_pointer;
///
/// assert_eq!(parse_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_pointer("/"), vec![""]);
/// assert_eq!(parse_pointer("/elements/card~1a/props"), vec!["elements", "card/a", "props"]);
/// ```
pub fn parse_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_segment).collect()
}

/// Formats segments as a pointer-style path.
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    for segment in path {
        out.push('/');
        out.push_str(&escape_segment(segment));
    }
    out
}

/// Splits a path into segments.
///
/// A leading `/` selects pointer syntax, anything else is dot-delimited.
///
/// ```
/// use ui_stream_path::split_path;
///
/// assert_eq!(split_path("form.email"), vec!["form", "email"]);
/// assert_eq!(split_path("/props/label"), vec!["props", "label"]);
/// assert!(split_path("").is_empty());
/// ```
pub fn split_path(path: &str) -> Path {
    if path.is_empty() {
        return Vec::new();
    }
    if path.starts_with('/') {
        return parse_pointer(path);
    }
    path.split('.').map(str::to_string).collect()
}

/// Check if a string is a canonical non-negative array index (`0`, `7`, `12`, not `007`).
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}
