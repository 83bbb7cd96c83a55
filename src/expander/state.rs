//! Per-conversion scanner state
//!
//! A `ConversionState` lives for exactly one conversion. Each input line is
//! fed through [`ConversionState::expand_line`], which returns the lines it
//! expands to; nothing leaks between conversions.

use crate::config::ExpanderConfig;
use crate::expander::motion::MotionLine;
use crate::parser::{find_tag, strip_tags, word_value, HoleWords, Tag, Word};

/// Z level to return to after each hole
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetractMode {
    /// `G98`: back to the Z seen before the cycle started
    InitialPlane,
    /// `G99`: back to the R-plane
    RPlane,
    #[default]
    Unset,
}

impl RetractMode {
    fn from_start_tag(tag: Tag) -> Self {
        match tag {
            Tag::StartInitialPlane => RetractMode::InitialPlane,
            Tag::StartRPlane => RetractMode::RPlane,
            _ => RetractMode::Unset,
        }
    }
}

/// Modal values of the current cycle, cleared at every cycle start
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleParameters {
    pub r_plane: Option<f64>,
    pub final_depth: Option<f64>,
    pub feedrate: Option<f64>,
    pub dwell: Option<f64>,
    pub peck_increment: Option<f64>,
}

impl CycleParameters {
    /// Take the words present on a hole line, keep the rest
    pub fn update(&mut self, words: &HoleWords) {
        self.final_depth = words.z.or(self.final_depth);
        self.r_plane = words.r.or(self.r_plane);
        self.feedrate = words.f.or(self.feedrate);
        self.dwell = words.p.or(self.dwell);
        self.peck_increment = words.q.or(self.peck_increment);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionState {
    pub cycle_active: bool,
    pub retract_mode: RetractMode,
    /// Last Z seen outside a cycle; never cleared
    pub initial_z: Option<f64>,
    pub params: CycleParameters,
    pub last_emitted: Option<String>,
}

impl ConversionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand one input line into zero or more output lines
    pub fn expand_line(&mut self, raw: &str, config: &ExpanderConfig) -> Vec<String> {
        let mut line = raw.trim().to_string();

        if let Some(tag) = find_tag(&line, &Tag::CYCLE_START) {
            self.cycle_active = true;
            self.retract_mode = RetractMode::from_start_tag(tag);
            self.params = CycleParameters::default();
            line = strip_tags(&line, &Tag::CYCLE_START);
        } else if find_tag(&line, &Tag::CYCLE_STOP).is_some() {
            self.cycle_active = false;
            line = strip_tags(&line, &Tag::CYCLE_STOP);
        }

        if self.cycle_active {
            if find_tag(&line, &Tag::HOLES).is_some() {
                let hole = strip_tags(&line, &Tag::HOLES);
                return self.expand_hole(&hole, config);
            }
            if !line.is_empty() {
                log::debug!("Dropping non-hole line inside a drilling cycle: {}", line);
            }
            return Vec::new();
        }

        if line.is_empty() {
            return Vec::new();
        }
        self.initial_z = word_value(&line, Word::Z).or(self.initial_z);
        vec![line]
    }

    /// Retract target of the current cycle
    pub fn retract_level(&self) -> Option<f64> {
        match self.retract_mode {
            RetractMode::InitialPlane => self.initial_z,
            RetractMode::RPlane => self.params.r_plane,
            RetractMode::Unset => None,
        }
    }

    fn expand_hole(&mut self, line: &str, config: &ExpanderConfig) -> Vec<String> {
        let words = HoleWords::read(line);
        self.params.update(&words);

        let retract = self.retract_level();
        let params = self.params;
        let mut moves = Vec::new();

        if words.x.is_some() || words.y.is_some() {
            moves.push(MotionLine::rapid().word('X', words.x).word('Y', words.y));
        }
        moves.push(MotionLine::rapid().word('Z', retract));

        match params.peck_increment {
            Some(peck) if peck > 0.0 => moves.extend(peck_moves(
                params.r_plane,
                params.final_depth,
                peck,
                params.feedrate,
            )),
            _ => moves.push(
                MotionLine::feed()
                    .word('F', params.feedrate)
                    .word('Z', params.final_depth),
            ),
        }

        if let Some(dwell) = params.dwell.filter(|d| *d > 0.0) {
            moves.push(MotionLine::dwell().word(config.dwell_unit.letter(), Some(dwell)));
        }

        moves.push(MotionLine::rapid().word('Z', retract));

        moves
            .iter()
            .map(|motion| {
                if motion.is_empty() {
                    log::warn!(
                        "{} without a value in hole '{}'",
                        motion.kind.code(),
                        line
                    );
                }
                motion.render(config.precision)
            })
            .collect()
    }

    /// Append a line to the output, honouring duplicate suppression
    pub fn emit(&mut self, line: String, suppress_duplicates: bool, output: &mut Vec<String>) {
        if suppress_duplicates && self.last_emitted.as_deref() == Some(line.as_str()) {
            return;
        }
        self.last_emitted = Some(line.clone());
        output.push(line);
    }
}

/// Upper bound on peck passes for a single hole
pub const MAX_PECK_PASSES: u64 = 100_000;

/// Peck passes from the R-plane down to `depth`
///
/// `floor(travel / peck) - 1` plunge/retract pairs, then a single plunge to
/// the final depth only when the travel is not a whole number of pecks.
/// Without both R and Z there is no travel and nothing is emitted. A pass
/// count that is not finite or exceeds [`MAX_PECK_PASSES`] is treated as
/// absent.
fn peck_moves(
    r_plane: Option<f64>,
    depth: Option<f64>,
    peck: f64,
    feedrate: Option<f64>,
) -> Vec<MotionLine> {
    let (Some(r_plane), Some(depth)) = (r_plane, depth) else {
        log::warn!("Peck drilling without R-plane or depth, no feed emitted");
        return Vec::new();
    };

    let travel = r_plane - depth;
    let ratio = (travel / peck).floor();
    let remainder = travel % peck;

    // negative and zero ratios give no passes
    let passes = if !ratio.is_finite() || ratio > MAX_PECK_PASSES as f64 {
        log::warn!(
            "Ignoring {} peck passes of {} over {}",
            ratio,
            peck,
            travel
        );
        0
    } else {
        ratio as u64
    };

    let mut moves = Vec::new();
    for pass in 1..passes {
        let current = snap(r_plane - pass as f64 * peck);
        moves.push(MotionLine::feed().word('F', feedrate).word('Z', Some(current)));
        moves.push(MotionLine::rapid().word('Z', Some(r_plane)));
    }
    if remainder > 0.0 {
        moves.push(MotionLine::feed().word('F', feedrate).word('Z', Some(depth)));
    }
    moves
}

/// Drop binary noise (below 1e-9) from a computed depth
fn snap(value: f64) -> f64 {
    let snapped = (value * 1e9).round() / 1e9;
    if snapped.is_finite() { snapped } else { value }
}
