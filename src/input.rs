//! Input handling - key reading and translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key modifier flags
pub mod key_flags {
    pub const CONTROL: u32 = 0x1000_0000;
    pub const META: u32 = 0x2000_0000;
    pub const CTLX: u32 = 0x4000_0000;
    pub const SPEC: u32 = 0x8000_0000;
}

/// Special key codes (low byte of a [`key_flags::SPEC`] key)
pub mod special {
    pub const HOME: u32 = 0x47;
    pub const UP: u32 = 0x48;
    pub const PAGE_UP: u32 = 0x49;
    pub const LEFT: u32 = 0x4b;
    pub const RIGHT: u32 = 0x4d;
    pub const END: u32 = 0x4f;
    pub const DOWN: u32 = 0x50;
    pub const PAGE_DOWN: u32 = 0x51;
    pub const DELETE: u32 = 0x53;
    /// F1 is `FN_BASE + 1`
    pub const FN_BASE: u32 = 0x3a;
}

/// Represents a key input with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u32);

impl Key {
    /// Create a key from a character
    pub fn char(ch: char) -> Self {
        Key(ch as u32)
    }

    /// Create a control key (C-x)
    pub fn ctrl(ch: char) -> Self {
        Key(key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a meta key (M-x or ESC x)
    pub fn meta(ch: char) -> Self {
        Key(key_flags::META | ch.to_ascii_lowercase() as u32)
    }

    /// Create a C-x prefixed key (C-x x)
    pub fn ctlx(ch: char) -> Self {
        Key(key_flags::CTLX | ch.to_ascii_lowercase() as u32)
    }

    /// Create a C-x C-x key (C-x C-x)
    pub fn ctlx_ctrl(ch: char) -> Self {
        Key(key_flags::CTLX | key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// Create a special key (function keys, arrows, etc.)
    pub fn special(code: u32) -> Self {
        Key(key_flags::SPEC | code)
    }

    /// Create a function key (F1..F12)
    pub fn function(n: u8) -> Self {
        Key::special(special::FN_BASE + n as u32)
    }

    /// Parse a key from its display name (`C-r`, `M-r`, `F5`, `C-x C-r`)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("C-x ") {
            let rest = rest.trim_start();
            if let Some(ch) = rest.strip_prefix("C-").and_then(single_char) {
                return Some(Key::ctlx_ctrl(ch));
            }
            return single_char(rest).map(Key::ctlx);
        }
        if let Some(ch) = s.strip_prefix("C-").and_then(single_char) {
            return Some(Key::ctrl(ch));
        }
        if let Some(ch) = s.strip_prefix("M-").and_then(single_char) {
            return Some(Key::meta(ch));
        }
        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=12).contains(&n).then(|| Key::function(n));
        }
        None
    }

    /// Get the raw key code
    pub fn code(&self) -> u32 {
        self.0
    }

    /// Check if this is a control key
    pub fn is_ctrl(&self) -> bool {
        self.0 & key_flags::CONTROL != 0
    }

    /// Check if this is a meta key
    pub fn is_meta(&self) -> bool {
        self.0 & key_flags::META != 0
    }

    /// Check if this is a C-x prefixed key
    pub fn is_ctlx(&self) -> bool {
        self.0 & key_flags::CTLX != 0
    }

    /// Check if this is a special key
    pub fn is_special(&self) -> bool {
        self.0 & key_flags::SPEC != 0
    }

    /// Check if this is a printable self-insert character
    pub fn is_self_insert(&self) -> bool {
        if self.0 & 0xF000_0000 != 0 {
            return false;
        }
        match char::from_u32(self.0) {
            Some(ch) => ch >= ' ' && ch != '\x7f',
            None => false,
        }
    }

    /// Get the character of a self-insert key
    pub fn as_char(&self) -> Option<char> {
        if self.is_self_insert() {
            char::from_u32(self.0)
        } else {
            None
        }
    }

    /// Convert key to a human-readable string (e.g., "C-f", "M-x", "C-x C-s")
    pub fn display_name(&self) -> String {
        let mut result = String::new();

        if self.is_ctlx() {
            result.push_str("C-x ");
        }
        if self.is_meta() {
            result.push_str("M-");
        }
        if self.is_ctrl() {
            result.push_str("C-");
        }

        if self.is_special() {
            let code = self.0 & 0xFF;
            let special_name = match code {
                special::HOME => "Home",
                special::UP => "Up",
                special::PAGE_UP => "PageUp",
                special::LEFT => "Left",
                special::RIGHT => "Right",
                special::END => "End",
                special::DOWN => "Down",
                special::PAGE_DOWN => "PageDown",
                special::DELETE => "Delete",
                n if (0x3b..=0x46).contains(&n) => {
                    return format!("{}F{}", result, n - special::FN_BASE);
                }
                _ => return format!("{}special-0x{:02x}", result, code),
            };
            result.push_str(special_name);
            return result;
        }

        let base = self.0 & 0x00FF_FFFF;
        if base == 0x7f {
            result.push_str("Backspace");
        } else if base == 0x20 {
            result.push_str("SPC");
        } else if let Some(ch) = char::from_u32(base) {
            result.push(ch);
        } else {
            result.push_str(&format!("0x{:x}", base));
        }

        result
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_whitespace() => Some(ch),
        _ => None,
    }
}

/// Input state for handling multi-key sequences
#[derive(Debug, Default)]
pub struct InputState {
    /// Waiting for C-x continuation
    ctlx_pending: bool,
    /// Waiting for Meta continuation (after ESC)
    meta_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if waiting for continuation key
    pub fn is_pending(&self) -> bool {
        self.ctlx_pending || self.meta_pending
    }

    /// Translate a crossterm KeyEvent to our Key representation
    pub fn translate_key(&mut self, event: KeyEvent) -> Option<Key> {
        let KeyEvent {
            code, modifiers, kind, ..
        } = event;

        // Windows reports release and repeat events too
        if kind != KeyEventKind::Press {
            return None;
        }

        if self.meta_pending {
            self.meta_pending = false;
            return self.translate_normal(code, modifiers).map(|k| Key(k.0 | key_flags::META));
        }

        if self.ctlx_pending {
            self.ctlx_pending = false;
            return self.translate_normal(code, modifiers).map(|k| Key(k.0 | key_flags::CTLX));
        }

        if code == KeyCode::Esc {
            self.meta_pending = true;
            return None;
        }

        if code == KeyCode::Char('x') && modifiers.contains(KeyModifiers::CONTROL) {
            self.ctlx_pending = true;
            return None;
        }

        self.translate_normal(code, modifiers)
    }

    fn translate_normal(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let alt = modifiers.contains(KeyModifiers::ALT);

        match code {
            KeyCode::Char(ch) => {
                if ctrl && alt {
                    Some(Key(key_flags::META | key_flags::CONTROL | ch.to_ascii_lowercase() as u32))
                } else if ctrl {
                    Some(Key::ctrl(ch))
                } else if alt {
                    Some(Key::meta(ch))
                } else {
                    Some(Key::char(ch))
                }
            }
            KeyCode::Enter => Some(Key::ctrl('m')),
            KeyCode::Tab => Some(Key::ctrl('i')),
            KeyCode::Backspace => Some(Key(0x7f)),
            KeyCode::Delete => Some(Key::special(special::DELETE)),
            KeyCode::Home => Some(Key::special(special::HOME)),
            KeyCode::End => Some(Key::special(special::END)),
            KeyCode::PageUp => Some(Key::special(special::PAGE_UP)),
            KeyCode::PageDown => Some(Key::special(special::PAGE_DOWN)),
            KeyCode::Up => Some(Key::special(special::UP)),
            KeyCode::Down => Some(Key::special(special::DOWN)),
            KeyCode::Left => Some(Key::special(special::LEFT)),
            KeyCode::Right => Some(Key::special(special::RIGHT)),
            KeyCode::F(n) => Some(Key::function(n)),
            KeyCode::Esc => Some(Key::ctrl('[')),
            _ => None,
        }
    }
}
