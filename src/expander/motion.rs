//! Generated motion lines

/// Kind of generated command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// `G0`
    Rapid,
    /// `G1`
    Feed,
    /// `G4`
    Dwell,
}

impl MoveKind {
    pub fn code(self) -> &'static str {
        match self {
            MoveKind::Rapid => "G0",
            MoveKind::Feed => "G1",
            MoveKind::Dwell => "G4",
        }
    }
}

/// A generated command and its words, in emission order
#[derive(Debug, Clone, PartialEq)]
pub struct MotionLine {
    pub kind: MoveKind,
    pub words: Vec<(char, f64)>,
}

impl MotionLine {
    pub fn new(kind: MoveKind) -> Self {
        Self {
            kind,
            words: Vec::new(),
        }
    }

    pub fn rapid() -> Self {
        Self::new(MoveKind::Rapid)
    }

    pub fn feed() -> Self {
        Self::new(MoveKind::Feed)
    }

    pub fn dwell() -> Self {
        Self::new(MoveKind::Dwell)
    }

    /// Append a word; an unset value leaves the word out
    pub fn word(mut self, letter: char, value: Option<f64>) -> Self {
        if let Some(value) = value {
            self.words.push((letter, value));
        }
        self
    }

    /// A line without any word carries no motion
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn render(&self, precision: Option<usize>) -> String {
        let mut line = self.kind.code().to_string();
        for (letter, value) in &self.words {
            line.push(' ');
            line.push(*letter);
            line.push_str(&format_number(*value, precision));
        }
        line
    }
}

/// Format a number for a generated word
///
/// Without a precision the shortest text that reads back as the same `f64`
/// is used, so copied coordinates are never altered. With one, the value is
/// rounded and trailing zeros are trimmed.
pub fn format_number(value: f64, precision: Option<usize>) -> String {
    let text = match precision {
        Some(precision) => {
            let rounded = format!("{:.*}", precision, value);
            if rounded.contains('.') {
                rounded
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_string()
            } else {
                rounded
            }
        }
        None => value.to_string(),
    };

    match text.as_str() {
        "-0" => "0".to_string(),
        _ => text,
    }
}
