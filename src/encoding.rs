//! Line encoding: separates a line's word structure from its literal payload.
//!
//! Runs of digits and punctuation vary on almost every log line (timestamps,
//! ids, paths), so they are lifted out of the body into a per-line [`Trailer`]
//! and replaced by a single [`PLACEHOLDER`]. What remains is a vocabulary of
//! words the adjacency graph can count.
//!
//! Encoding happens in two steps. [`encode`] wraps every run in a pair of
//! control-character markers, leaving a trailing `{...}` annotation untouched.
//! [`split_trailer`] then moves the annotation and the wrapped runs into the
//! trailer and cleans the body.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Opens a wrapped digit/punctuation run.
pub const RUN_OPEN: char = '\u{2}';

/// Closes a wrapped digit/punctuation run.
pub const RUN_CLOSE: char = '\u{3}';

/// Stands in for every run once the body is cleaned.
pub const PLACEHOLDER: &str = "#";

static RE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"[0-9!"#$%&'()*+,./:;<=>?@\[\]^`{|}~]+"##).expect("valid run pattern")
});

static RE_WRAPPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{2}([^\u{3}]*)\u{3}").expect("valid marker pattern"));

// Lazy body so the annotation starts at the first " {".
static RE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?) \{(.*)\}$").expect("valid annotation pattern"));

/// Splits a right-trimmed line into its body and trailing `{...}` annotation.
///
/// An unmatched brace simply means there is no annotation.
fn split_annotation(line: &str) -> (&str, Option<&str>) {
    match RE_ANNOTATION.captures(line) {
        Some(caps) => {
            let body = caps.get(1).map_or("", |m| m.as_str());
            let note = caps.get(2).map(|m| m.as_str());
            (body, note)
        }
        None => (line, None),
    }
}

/// Wraps every maximal digit/punctuation run in [`RUN_OPEN`]/[`RUN_CLOSE`].
///
/// A trailing ` {...}` annotation is carried through verbatim.
pub fn encode(line: &str) -> String {
    let line = line.trim_end();
    let (body, note) = split_annotation(line);

    // Stray markers in the input would confuse run extraction
    let body = body.replace([RUN_OPEN, RUN_CLOSE], "");
    let replacement = format!("{RUN_OPEN}${{0}}{RUN_CLOSE}");
    let mut encoded = RE_RUN.replace_all(&body, replacement.as_str()).into_owned();

    if let Some(note) = note {
        encoded.push_str(" {");
        encoded.push_str(note);
        encoded.push('}');
    }
    encoded
}

/// Strips the annotation and collapses each wrapped run to [`PLACEHOLDER`].
///
/// Words end up separated by single spaces, the same separator rule phrases
/// are joined with.
pub fn clean(encoded: &str) -> String {
    let (body, _) = split_annotation(encoded.trim_end());
    RE_WRAPPED
        .replace_all(body, PLACEHOLDER)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Separates an encoded line into its cleaned body and its trailer.
///
/// The trailer holds the original annotation followed by the literal text of
/// every wrapped run, left to right, space-joined.
pub fn split_trailer(encoded: &str) -> (String, Trailer) {
    let line = encoded.trim_end();
    let (body, note) = split_annotation(line);

    let mut items: Vec<&str> = Vec::new();
    if let Some(note) = note {
        items.push(note);
    }
    items.extend(
        RE_WRAPPED
            .captures_iter(body)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str())),
    );

    let trailer = Trailer(items.join(" ").trim().to_string());
    (clean(line), trailer)
}

/// Opaque per-line payload: the annotation plus every lifted literal.
///
/// Rules never match against trailer content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trailer(String);

impl Trailer {
    /// The trailer content without surrounding braces.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when there is nothing to reattach.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Trailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, "{{{}}}", self.0)
        }
    }
}

/// An in-flight line: a mutable body and its trailer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    body: String,
    trailer: Trailer,
}

impl Line {
    /// Encodes a raw line and splits off its trailer.
    pub fn from_raw(raw: &str) -> Self {
        let (body, trailer) = split_trailer(&encode(raw));
        Self { body, trailer }
    }

    /// The word structure subject to rule substitution.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The literal payload lifted out of the body.
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    pub(crate) fn set_body(&mut self, body: String) {
        self.body = body;
    }

    /// Body and trailer joined for output.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body.trim_end();
        match (body.is_empty(), self.trailer.is_empty()) {
            (_, true) => f.write_str(body),
            (true, false) => write!(f, "{}", self.trailer),
            (false, false) => write!(f, "{} {}", body, self.trailer),
        }
    }
}
