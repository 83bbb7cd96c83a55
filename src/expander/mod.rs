//! Canned-cycle expansion
//!
//! Turns `G98`/`G99` … `G81`/`G82`/`G83` … `G80` regions into explicit
//! rapid, feed and dwell moves.

pub mod engine;
pub mod motion;
pub mod state;

pub use engine::{expand, CycleExpander, HEADER_LINES};
pub use motion::{format_number, MotionLine, MoveKind};
pub use state::{ConversionState, CycleParameters, RetractMode};
