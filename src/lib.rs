//! # Logpress - Rule-Induction Log Compression
//!
//! Mines repeated word pairs in a stream of text lines and replaces them with
//! short tokens, producing a smaller text plus the dictionary of phrases it
//! substituted.
//!
//! Each line is first split into a word structure and a trailer holding its
//! digit/punctuation literals. Lines are then pressed in windows:
//! 1. **Apply**: every known rule is applied to the line, oldest first
//! 2. **Count**: consecutive words are counted in a global adjacency graph
//! 3. **Induce**: a pair seen `threshold` times becomes a new rule with a fresh token
//! 4. **Backfill**: new rules are applied to the lines already passed
//!
//! Passes repeat until nothing changes. Rules can nest: a later rule's phrase
//! may contain an earlier rule's token.
//!
//! ## Example
//!
//! ```
//! use logpress_rs::Compressor;
//!
//! let mut compressor = Compressor::new();
//! for i in 0..25 {
//!     compressor.push(&format!("worker {i} saw connection reset by peer"));
//! }
//!
//! let report = compressor.finish();
//! assert_eq!(report.lines().len(), 25);
//! assert!(report.expressions().iter().any(|p| p == "connection reset"));
//! println!("{report}");
//! ```

mod compressor;
mod config;
mod encoding;
mod error;
mod graph;
mod report;
mod rule;
mod token;


pub use compressor::{CompressionStats, Compressor};
pub use config::{Config, DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE};
pub use encoding::{clean, encode, split_trailer, Line, Trailer, PLACEHOLDER};
pub use error::{CompressError, Result};
pub use graph::{Adjacency, AdjacencyGraph, NodeId, WordNode};
pub use report::{Report, EXPRESSIONS_MARKER};
pub use rule::{Rule, RuleId, RuleSet};
pub use token::{Token, TokenAllocator};
