//! Word (parameter) extraction
//!
//! A word is a letter immediately followed by a signed decimal number, e.g.
//! `Z-5`, `F100`, `Q.5`. Extraction never fails: a malformed or non-finite
//! number is treated as an absent word.

/// Letters read from drilling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word {
    X,
    Y,
    Z,
    R,
    F,
    P,
    Q,
}

impl Word {
    pub fn letter(self) -> char {
        match self {
            Word::X => 'X',
            Word::Y => 'Y',
            Word::Z => 'Z',
            Word::R => 'R',
            Word::F => 'F',
            Word::P => 'P',
            Word::Q => 'Q',
        }
    }
}

/// Value of the first well-formed `<letter><number>` in the line
///
/// Occurrences of the letter that are not followed by a number are skipped,
/// so `(Z axis) Z-2` yields `-2`.
pub fn word_value(line: &str, word: Word) -> Option<f64> {
    line.match_indices(word.letter())
        .find_map(|(idx, _)| parse_number(&line[idx + 1..]))
}

/// Parse the signed decimal number at the start of `text`
fn parse_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Every word a hole line may carry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoleWords {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub r: Option<f64>,
    pub f: Option<f64>,
    pub p: Option<f64>,
    pub q: Option<f64>,
}

impl HoleWords {
    /// Read all hole words from a line
    pub fn read(line: &str) -> Self {
        Self {
            x: word_value(line, Word::X),
            y: word_value(line, Word::Y),
            z: word_value(line, Word::Z),
            r: word_value(line, Word::R),
            f: word_value(line, Word::F),
            p: word_value(line, Word::P),
            q: word_value(line, Word::Q),
        }
    }
}
