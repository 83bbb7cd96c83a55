//! Program statistics
//!
//! Informational counts for the host to display. Characters are counted
//! without line terminators.

use serde::Serialize;

use crate::parser::{count_tags, Tag};

/// Input and output statistics of a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgramStats {
    pub input_chars: usize,
    pub input_lines: usize,
    pub cycles_count: usize,
    pub holes_count: usize,
    pub output_chars: usize,
    pub output_lines: usize,
}

impl ProgramStats {
    /// Statistics of a freshly loaded program (no output yet)
    pub fn for_input(text: &str) -> Self {
        Self {
            input_chars: count_chars(text),
            input_lines: text.split('\n').count(),
            cycles_count: count_tags(text, &Tag::CYCLE_START),
            holes_count: count_tags(text, &Tag::HOLES),
            output_chars: 0,
            output_lines: 0,
        }
    }

    /// Record the output of a conversion
    pub fn record_output(&mut self, lines: &[String], text: &str) {
        self.output_lines = lines.len();
        self.output_chars = count_chars(text);
    }
}

/// Number of characters, line terminators excluded
pub fn count_chars(text: &str) -> usize {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).count()
}
