//! Text primitives shared by the editing core.
//!
//! Nothing in here knows about highlighting, completion or key events. It only
//! answers questions about characters and lines of a [`ropey::Rope`].

pub mod chars;
pub mod line_ending;
pub mod rope;
