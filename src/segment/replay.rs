//! Text reconstruction: replay key events into the literal text they type.

use crate::key::{Key, KeyEvent, KeyEventKind};
use unicode_segmentation::UnicodeSegmentation;

/// Replay `events` and return the text they produce.
///
/// Shift state follows shift press/release, caps lock toggles on press and
/// backspace removes the last grapheme. Keys that type nothing (modifiers,
/// function keys, unknown keys) leave the text untouched.
pub fn replay<'a, I>(events: I) -> String
where
    I: IntoIterator<Item = &'a KeyEvent>,
{
    let mut text = String::new();
    let mut shift = false;
    let mut caps = false;

    for event in events {
        let pressed = event.kind == KeyEventKind::Press;
        match &event.key {
            key if key.is_shift() => shift = pressed,
            Key::CapsLock if pressed => caps = !caps,
            Key::Backspace if pressed => pop_grapheme(&mut text),
            Key::Space if pressed => text.push(' '),
            Key::Char(c) if pressed => {
                if shift ^ caps {
                    text.extend(c.to_uppercase());
                } else {
                    text.push(*c);
                }
            }
            _ => {}
        }
    }

    text
}

/// The word being typed: everything after the last whitespace.
pub fn current_word(text: &str) -> &str {
    text.rsplit(char::is_whitespace).next().unwrap_or_default()
}

fn pop_grapheme(text: &mut String) {
    if let Some((index, _)) = text.grapheme_indices(true).next_back() {
        text.truncate(index);
    }
}
