//! Editor-surface capability
//!
//! The core drives any editor widget through [`EditorSurface`]. Adapters
//! translate their native input into [`SurfaceEvent`]s and own the
//! installed decorations; the core only ever holds the handles.

use std::fmt;

use crate::decoration::{Decoration, DecorationHandle};
use crate::input::Key;

/// A key combination that invokes the run operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord(pub Key);

impl KeyChord {
    /// Parse a chord such as `C-r`, `M-r`, `F5` or `C-x C-r`
    pub fn parse(s: &str) -> Option<Self> {
        Key::parse(s).map(KeyChord)
    }

    /// The underlying key
    pub fn key(&self) -> Key {
        self.0
    }
}

impl Default for KeyChord {
    fn default() -> Self {
        KeyChord(Key::ctrl('r'))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.display_name())
    }
}

/// Notifications raised by an editor surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The text changed through an edit
    Edited,
    /// A registered trigger chord was pressed
    Trigger,
    /// The user asked to close the view
    Quit,
}

/// Capabilities the core needs from an editor widget
pub trait EditorSurface {
    /// Current text of the surface
    fn text(&self) -> String;

    /// Replace the whole text
    fn set_text(&mut self, text: &str);

    /// Register a chord that raises [`SurfaceEvent::Trigger`]
    fn bind_trigger(&mut self, chord: KeyChord);

    /// Remove the decorations in `previous` and install `next` in one step
    ///
    /// Returns the handles of the newly installed decorations, in the order
    /// of `next`. Handles in `previous` that the surface no longer knows are
    /// ignored.
    fn replace_decorations(
        &mut self,
        previous: &[DecorationHandle],
        next: &[Decoration],
    ) -> Vec<DecorationHandle>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chord() {
        let chord = KeyChord::default();
        assert_eq!(chord.to_string(), "C-r");
        assert_eq!(KeyChord::parse("C-r"), Some(chord));
    }

    #[test]
    fn test_parse_chords() {
        assert_eq!(KeyChord::parse("F5").map(|c| c.to_string()), Some("F5".to_string()));
        assert_eq!(KeyChord::parse("C-x C-r").map(|c| c.to_string()), Some("C-x C-r".to_string()));
        assert_eq!(KeyChord::parse(""), None);
    }
}
