use crate::config::Config;
use crate::encoding::Line;
use crate::error::Result;
use crate::graph::AdjacencyGraph;
use crate::report::Report;
use crate::rule::{RuleId, RuleSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Windowed rule-induction compressor.
///
/// Lines are buffered into windows of [`Config::window_size`]. Each window is
/// rewritten to a fixpoint: every pass applies the known rules, walks each
/// line through the adjacency graph, induces a rule whenever a word pair is
/// seen [`Config::threshold`] times, and backfills new rules onto the lines
/// already passed. The graph and rule set are shared by all windows.
pub struct Compressor {
    config: Config,
    graph: AdjacencyGraph,
    rules: RuleSet,

    /// Raw lines waiting for a full window
    pending: Vec<String>,

    /// Pressed lines, in input order
    compressed: Vec<Line>,

    input_bytes: usize,
    windows: usize,
    passes: usize,
    substitutions: usize,
}

impl Compressor {
    /// Creates a compressor with the default threshold and window size.
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// Creates a compressor with a validated configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        Self {
            config,
            graph: AdjacencyGraph::new(),
            rules: RuleSet::new(),
            pending: Vec::new(),
            compressed: Vec::new(),
            input_bytes: 0,
            windows: 0,
            passes: 0,
            substitutions: 0,
        }
    }

    /// Buffers a raw line, pressing the window once it is full.
    pub fn push(&mut self, line: &str) {
        self.pending.push(line.to_string());
        if self.pending.len() >= self.config.window_size {
            let window = std::mem::take(&mut self.pending);
            self.press_window(&window);
        }
    }

    /// Pushes every line in order.
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push(line.as_ref());
        }
    }

    /// Presses a trailing partial window.
    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            let window = std::mem::take(&mut self.pending);
            self.press_window(&window);
        }
    }

    /// Encodes and presses one window of raw lines to its fixpoint.
    ///
    /// Buffered lines are pressed first as their own window, so output keeps
    /// input order. Returns the window's lines as they stand after
    /// convergence.
    pub fn press<S: AsRef<str>>(&mut self, window: &[S]) -> &[Line] {
        self.flush();
        self.press_window(window)
    }

    fn press_window<S: AsRef<str>>(&mut self, window: &[S]) -> &[Line] {
        let mut lines: Vec<Line> = window
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                self.input_bytes += raw.len() + 1;
                Line::from_raw(raw)
            })
            .collect();

        let mut passes = 0;
        let mut changed = 0;
        loop {
            passes += 1;
            let changes = self.pass(&mut lines);
            trace!(window = self.windows, pass = passes, changes, "pass finished");
            if changes == 0 {
                break;
            }
            changed += changes;
        }

        debug!(
            window = self.windows,
            lines = lines.len(),
            passes,
            changes = changed,
            rules = self.rules.len(),
            "window converged"
        );
        self.windows += 1;
        self.passes += passes;

        let start = self.compressed.len();
        self.compressed.extend(lines);
        &self.compressed[start..]
    }

    /// One pass over a window followed by catch-up.
    ///
    /// Returns substitutions plus inductions; zero means the window is at its
    /// fixpoint.
    fn pass(&mut self, lines: &mut [Line]) -> usize {
        let sentinel = self.graph.sentinel();
        let mut changes = 0;
        let mut catch_up: Vec<(RuleId, usize)> = Vec::new();

        for (index, line) in lines.iter_mut().enumerate() {
            let (body, delta) = self.rules.apply_all(line.body());
            line.set_body(body);
            changes += delta;
            self.substitutions += delta;

            for adjacency in self.graph.walk_line(line.body()) {
                if adjacency.count < self.config.threshold || adjacency.predecessor == sentinel {
                    continue;
                }
                if let Some(id) = self
                    .rules
                    .induce(&self.graph, adjacency.predecessor, adjacency.node)
                {
                    catch_up.push((id, index));
                    changes += 1;
                }
            }
        }

        // Lines past a rule's origin already saw it in apply_all
        for (id, origin) in catch_up {
            let Some(rule) = self.rules.get(id) else {
                continue;
            };
            for line in &mut lines[..=origin] {
                let (body, delta) = rule.apply(line.body());
                if delta > 0 {
                    line.set_body(body);
                    changes += delta;
                    self.substitutions += delta;
                }
            }
        }

        changes
    }

    /// Assembles the report over every pressed line.
    ///
    /// The full rule set is applied once more to each line, so lines pressed
    /// early pick up rules induced in later windows. Buffered lines that have
    /// not been pressed yet are not included; see [`Compressor::finish`].
    pub fn report(&self) -> Report {
        let lines = self
            .compressed
            .iter()
            .map(|line| {
                let (body, _) = self.rules.apply_all(line.body());
                let mut line = line.clone();
                line.set_body(body);
                line.render()
            })
            .collect();
        let expressions = self.rules.phrases().map(str::to_string).collect();
        Report::new(lines, expressions, self.input_bytes)
    }

    /// Presses any buffered lines and returns the final report.
    pub fn finish(mut self) -> Report {
        self.flush();
        self.report()
    }

    /// Compresses every line of `reader`.
    pub fn compress_reader<R: BufRead>(mut self, reader: R) -> Result<Report> {
        for line in reader.lines() {
            self.push(&line?);
        }
        Ok(self.finish())
    }

    /// Compresses the file at `path`.
    pub fn compress_path<P: AsRef<Path>>(self, path: P) -> Result<Report> {
        let file = File::open(path)?;
        self.compress_reader(BufReader::new(file))
    }

    /// The configuration this compressor runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the adjacency graph.
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    /// Rules induced so far, in creation order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Pressed lines as they stood when their window converged.
    pub fn lines(&self) -> &[Line] {
        &self.compressed
    }

    /// Number of lines pressed so far.
    pub fn len(&self) -> usize {
        self.compressed.len()
    }

    /// True when no line has been pressed yet.
    pub fn is_empty(&self) -> bool {
        self.compressed.is_empty()
    }

    /// Returns compression statistics.
    pub fn stats(&self) -> CompressionStats {
        CompressionStats {
            input_lines: self.compressed.len(),
            input_bytes: self.input_bytes,
            windows: self.windows,
            passes: self.passes,
            substitutions: self.substitutions,
            rules: self.rules.len(),
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters describing the work done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Lines pressed
    pub input_lines: usize,
    /// Bytes pressed, one newline per line included
    pub input_bytes: usize,
    /// Windows pressed
    pub windows: usize,
    /// Passes across all windows
    pub passes: usize,
    /// Phrase replacements made while pressing
    pub substitutions: usize,
    /// Rules induced
    pub rules: usize,
}

impl CompressionStats {
    /// Average number of rules induced per pressed line.
    pub fn rules_per_line(&self) -> f64 {
        if self.input_lines == 0 {
            0.0
        } else {
            self.rules as f64 / self.input_lines as f64
        }
    }
}
