//! Tunable constants for the compression loop.

use crate::error::{CompressError, Result};

/// Minimum adjacency count before a phrase becomes a rule.
pub const DEFAULT_THRESHOLD: u32 = 5;

/// Number of lines pressed together before moving on.
pub const DEFAULT_WINDOW_SIZE: usize = 25;

/// Compressor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Observation count an edge must reach before its phrase is induced.
    pub threshold: u32,
    /// Lines per window.
    pub window_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl Config {
    /// Creates a configuration with explicit values.
    pub fn new(threshold: u32, window_size: usize) -> Self {
        Self {
            threshold,
            window_size,
        }
    }

    /// Sets the induction threshold.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the number of lines per window.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Rejects values the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(CompressError::InvalidConfig(
                "threshold must be at least 1".into(),
            ));
        }
        if self.window_size == 0 {
            return Err(CompressError::InvalidConfig(
                "window size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.threshold, 5);
        assert_eq!(config.window_size, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::default().with_threshold(2).with_window_size(4);
        assert_eq!(config, Config::new(2, 4));
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(matches!(
            Config::new(0, 25).validate(),
            Err(CompressError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new(5, 0).validate(),
            Err(CompressError::InvalidConfig(_))
        ));
    }
}
