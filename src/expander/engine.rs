//! Cycle Expander
//!
//! Holds a program, its statistics and the conversion settings, and runs the
//! expansion over the stored lines.

use chrono::{DateTime, Utc};

use crate::config::{DwellUnit, ExpanderConfig};
use crate::expander::state::ConversionState;
use crate::stats::ProgramStats;

/// Number of comment lines prepended to every output
pub const HEADER_LINES: usize = 3;

/// Expands canned drilling cycles of a stored program
#[derive(Debug, Clone, Default)]
pub struct CycleExpander {
    config: ExpanderConfig,
    lines: Vec<String>,
    stats: ProgramStats,
}

impl CycleExpander {
    pub fn new(config: ExpanderConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
            stats: ProgramStats::default(),
        }
    }

    /// Store a program and compute its input statistics
    ///
    /// Output statistics describe the header alone until the next conversion.
    pub fn set_program(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.stats = ProgramStats::for_input(text);

        let header = header_lines(Utc::now());
        let header_text = header.join("\n") + "\n";
        self.stats.record_output(&header, &header_text);
        log::debug!(
            "Loaded program: {} lines, {} cycles, {} holes",
            self.stats.input_lines,
            self.stats.cycles_count,
            self.stats.holes_count
        );
    }

    /// Convert the stored program, stamping the header with the current time
    pub fn convert(&mut self) -> String {
        self.convert_at(Utc::now())
    }

    /// Convert the stored program with an explicit header timestamp
    pub fn convert_at(&mut self, timestamp: DateTime<Utc>) -> String {
        let suppress = self.config.suppress_duplicate_lines;
        let mut state = ConversionState::new();
        let mut output = Vec::with_capacity(self.lines.len() + HEADER_LINES);

        for line in header_lines(timestamp) {
            state.emit(line, suppress, &mut output);
        }
        for line in &self.lines {
            for expanded in state.expand_line(line, &self.config) {
                state.emit(expanded, suppress, &mut output);
            }
        }

        let mut text = output.join("\n");
        text.push('\n');
        self.stats.record_output(&output, &text);
        log::info!(
            "Converted {} input lines into {} output lines",
            self.stats.input_lines,
            self.stats.output_lines
        );

        text
    }

    pub fn set_suppress_duplicate_lines(&mut self, suppress: bool) {
        self.config.suppress_duplicate_lines = suppress;
    }

    pub fn set_dwell_unit(&mut self, unit: DwellUnit) {
        self.config.dwell_unit = unit;
    }

    /// Round generated numbers to `precision` decimals, or keep them exact with `None`
    pub fn set_precision(&mut self, precision: Option<usize>) {
        self.config.precision = precision;
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    pub fn stats(&self) -> &ProgramStats {
        &self.stats
    }

    /// The stored program, one entry per input line
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Expand a program without header or statistics
pub fn expand(text: &str, config: &ExpanderConfig) -> Vec<String> {
    let mut state = ConversionState::new();
    let mut output = Vec::new();
    for line in text.split('\n') {
        for expanded in state.expand_line(line, config) {
            state.emit(expanded, config.suppress_duplicate_lines, &mut output);
        }
    }
    output
}

fn header_lines(timestamp: DateTime<Utc>) -> [String; HEADER_LINES] {
    [
        format!(
            "(Converted on {})",
            timestamp.format("%a, %d %b %Y %H:%M:%S GMT")
        ),
        "(by Canned Drilling Cycles Expander)".to_string(),
        format!("(ccx {})", env!("CARGO_PKG_VERSION")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_header() {
        let mut expander = CycleExpander::default();
        expander.set_program("G0 X1");
        let output = expander.convert_at(fixed_time());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "(Converted on Tue, 05 Mar 2024 14:07:09 GMT)");
        assert_eq!(lines[1], "(by Canned Drilling Cycles Expander)");
        assert!(lines[2].starts_with("(ccx "));
        assert_eq!(lines[3], "G0 X1");
        assert!(output.ends_with("G0 X1\n"));
    }

    #[test]
    fn test_output_stats_include_header() {
        let mut expander = CycleExpander::default();
        expander.set_program("G0 X1\nG0 X2\n");
        let output = expander.convert_at(fixed_time());

        assert_eq!(expander.stats().output_lines, HEADER_LINES + 2);
        assert_eq!(
            expander.stats().output_chars,
            output.chars().filter(|c| *c != '\n').count()
        );
    }

    #[test]
    fn test_loaded_program_reports_header_only_output() {
        let mut expander = CycleExpander::default();
        expander.set_program("G0 X1\nG0 X2");
        let loaded = *expander.stats();
        assert_eq!(loaded.output_lines, HEADER_LINES);
        assert!(loaded.output_chars > 0);

        expander.set_program("");
        let header_only = expander.convert_at(fixed_time());
        assert_eq!(expander.stats().output_lines, HEADER_LINES);
        assert_eq!(loaded.output_chars, header_only.len() - HEADER_LINES);
    }

    #[test]
    fn test_setters_affect_next_conversion() {
        let mut expander = CycleExpander::default();
        expander.set_program("G99\nG82 X1 Z-1 R1 F10 P2\nG80");

        let before = expander.convert_at(fixed_time());
        assert!(before.contains("G4 S2\n"));

        expander.set_dwell_unit(DwellUnit::Milliseconds);
        let after = expander.convert_at(fixed_time());
        assert!(after.contains("G4 P2\n"));
        assert_eq!(expander.config().dwell_unit, DwellUnit::Milliseconds);
    }

    #[test]
    fn test_conversions_do_not_share_state() {
        let mut expander = CycleExpander::default();
        expander.set_program("G99\nG81 X1 Z-1 R1 F10");
        let first = expander.convert_at(fixed_time());
        let second = expander.convert_at(fixed_time());
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_body_only() {
        let body = expand("G0 Z5\nG98\nG81 X1 Z-1 R1 F10\nG80\nM30", &ExpanderConfig::default());
        assert_eq!(
            body,
            vec!["G0 Z5", "G0 X1", "G0 Z5", "G1 F10 Z-1", "G0 Z5", "M30"]
        );
    }
}
