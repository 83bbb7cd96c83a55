//! Drilling-cycle parser
//!
//! Recognises canned-cycle tags and extracts the words a hole line carries.
//! This is deliberately not a general G-code parser: anything it does not
//! recognise is left to pass through untouched.

pub mod tags;
pub mod words;

pub use tags::{count_tags, find_tag, strip_tags, Tag};
pub use words::{word_value, HoleWords, Word};
