//! The textual result of a compression run.

use std::fmt;

/// Line separating compressed lines from the rule listing.
pub const EXPRESSIONS_MARKER: &str = "## EXPRESSIONS ##";

/// Compressed lines followed by every induced phrase in creation order.
///
/// Rendered form:
///
/// ```text
/// <1> # <2> {2024 01 01 404}
/// ...
///
/// ## EXPRESSIONS ##
/// connection reset, <1> by, ...
/// ```
///
/// Every `<...>` token in a line body or in the phrase list belongs to an
/// induced rule. Trailers are literal input: angle brackets there (a raw
/// `<7>`, an HTML tag) are copied verbatim and name no rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
    expressions: Vec<String>,
    input_bytes: usize,
}

impl Report {
    pub(crate) fn new(lines: Vec<String>, expressions: Vec<String>, input_bytes: usize) -> Self {
        Self {
            lines,
            expressions,
            input_bytes,
        }
    }

    /// Compressed lines, one per input line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Induced phrases in creation order.
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    /// Every output line: the compressed lines, a blank line, the marker and
    /// the comma-separated phrase list.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().cloned().chain([
            String::new(),
            EXPRESSIONS_MARKER.to_string(),
            self.expressions.join(", "),
        ])
    }

    /// Size of the input, counting one newline per line.
    pub fn input_bytes(&self) -> usize {
        self.input_bytes
    }

    /// Size of the rendered report.
    pub fn output_bytes(&self) -> usize {
        self.iter().map(|line| line.len() + 1).sum()
    }

    /// Output size as a percentage of input size.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            (self.output_bytes() as f64 / self.input_bytes as f64) * 100.0
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.iter() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
