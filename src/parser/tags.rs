//! Canned-cycle tag recognition
//!
//! Tags are matched case-sensitively anywhere in a line. A code only counts
//! as a tag when it is not followed by another digit or a dot, so `G980` or
//! `G81.1` never match `G98`/`G81`.

/// A G-code that opens, closes or invokes a canned drilling cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `G98`: retract to the initial Z after each hole
    StartInitialPlane,
    /// `G99`: retract to the R-plane after each hole
    StartRPlane,
    /// `G80`: cancel the active cycle
    Stop,
    /// `G81`: plain drill
    Drill,
    /// `G82`: drill with dwell at the bottom
    DrillDwell,
    /// `G83`: peck drill
    PeckDrill,
}

impl Tag {
    /// Tags that open a cycle region
    pub const CYCLE_START: [Tag; 2] = [Tag::StartInitialPlane, Tag::StartRPlane];
    /// Tags that close a cycle region
    pub const CYCLE_STOP: [Tag; 1] = [Tag::Stop];
    /// Tags that invoke a hole inside a cycle region
    pub const HOLES: [Tag; 3] = [Tag::Drill, Tag::DrillDwell, Tag::PeckDrill];

    /// The G-code text of this tag
    pub fn code(self) -> &'static str {
        match self {
            Tag::StartInitialPlane => "G98",
            Tag::StartRPlane => "G99",
            Tag::Stop => "G80",
            Tag::Drill => "G81",
            Tag::DrillDwell => "G82",
            Tag::PeckDrill => "G83",
        }
    }
}

/// Byte offsets of each occurrence of `code` in `line`
fn occurrences(line: &str, code: &str) -> Vec<usize> {
    line.match_indices(code)
        .map(|(idx, _)| idx)
        .filter(|idx| is_terminated(line, idx + code.len()))
        .collect()
}

fn is_terminated(line: &str, end: usize) -> bool {
    !matches!(line.as_bytes().get(end), Some(b) if b.is_ascii_digit() || *b == b'.')
}

/// Find the earliest tag of `candidates` present in the line
pub fn find_tag(line: &str, candidates: &[Tag]) -> Option<Tag> {
    candidates
        .iter()
        .filter_map(|tag| {
            occurrences(line, tag.code())
                .first()
                .map(|idx| (*idx, *tag))
        })
        .min_by_key(|(idx, _)| *idx)
        .map(|(_, tag)| tag)
}

/// Count every occurrence of any of `candidates` in a whole text
pub fn count_tags(text: &str, candidates: &[Tag]) -> usize {
    candidates
        .iter()
        .map(|tag| occurrences(text, tag.code()).len())
        .sum()
}

/// Remove every occurrence of `candidates` (and one following space) from the
/// line, returning the trimmed remainder
pub fn strip_tags(line: &str, candidates: &[Tag]) -> String {
    let mut current = line.to_string();

    for tag in candidates {
        let code = tag.code();
        let positions = occurrences(&current, code);
        if positions.is_empty() {
            continue;
        }

        let mut stripped = String::with_capacity(current.len());
        let mut rest = 0;
        for idx in positions {
            stripped.push_str(&current[rest..idx]);
            let mut end = idx + code.len();
            if current[end..].starts_with(' ') {
                end += 1;
            }
            rest = end;
        }
        stripped.push_str(&current[rest..]);
        current = stripped;
    }

    current.trim().to_string()
}
