//! Word segmentation over raw key events.

mod replay;
mod segmenter;

pub use replay::{current_word, replay};
pub use segmenter::{is_ignored, is_terminator, Segmenter};
