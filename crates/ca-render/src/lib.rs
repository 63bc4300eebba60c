//! TUI rendering for cellscii.
//!
//! Half-block canvas, scrollback of drawn row pairs, generation rate and the
//! screens used by the interactive prompter.

pub mod canvas;
pub mod rate;
pub mod scrollback;
pub mod ui;
