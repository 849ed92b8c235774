//! Terminal abstraction using crossterm

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent},
    execute, queue,
    style::{self as term_style, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::error::Result;
use crate::syntax::{Color, Style};

/// Terminal wrapper holding raw mode for its lifetime
pub struct Terminal {
    /// Terminal width in columns
    cols: u16,
    /// Terminal height in rows
    rows: u16,
}

impl Terminal {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { cols, rows })
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Clear the entire screen
    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Clear from cursor to end of line
    pub fn clear_to_eol(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Move cursor to position (0-indexed)
    pub fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        queue!(io::stdout(), cursor::MoveTo(col, row))?;
        Ok(())
    }

    /// Write a string at current cursor position
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(io::stdout(), Print(s))?;
        Ok(())
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            queue!(io::stdout(), cursor::Show)?;
        } else {
            queue!(io::stdout(), cursor::Hide)?;
        }
        Ok(())
    }

    /// Wait up to `timeout` for an input event
    pub fn poll_event(&mut self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    /// Read one pending event
    ///
    /// Resizes update the stored size and yield `None`, as do mouse and
    /// focus events.
    pub fn read_event(&mut self) -> Result<Option<KeyEvent>> {
        match event::read()? {
            Event::Key(key_event) => Ok(Some(key_event)),
            Event::Resize(cols, rows) => {
                self.cols = cols;
                self.rows = rows;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Switch output to `style`, starting from plain attributes
    pub fn apply_style(&mut self, style: &Style) -> Result<()> {
        let mut out = io::stdout();
        queue!(out, SetAttribute(Attribute::Reset))?;
        if style.fg != Color::Default {
            queue!(out, SetForegroundColor(to_term_color(style.fg)))?;
        }
        if style.bg != Color::Default {
            queue!(out, SetBackgroundColor(to_term_color(style.bg)))?;
        }
        if style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }

    /// Set dim/faint mode (line numbers)
    pub fn set_dim(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            queue!(io::stdout(), SetAttribute(Attribute::Dim))?;
        } else {
            queue!(io::stdout(), SetAttribute(Attribute::NormalIntensity))?;
        }
        Ok(())
    }

    /// Reset all attributes
    pub fn reset_attributes(&mut self) -> Result<()> {
        queue!(io::stdout(), SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn to_term_color(color: Color) -> term_style::Color {
    match color {
        Color::Default => term_style::Color::Reset,
        Color::Black => term_style::Color::Black,
        Color::Red => term_style::Color::DarkRed,
        Color::Green => term_style::Color::DarkGreen,
        Color::Yellow => term_style::Color::DarkYellow,
        Color::Blue => term_style::Color::DarkBlue,
        Color::Magenta => term_style::Color::DarkMagenta,
        Color::Cyan => term_style::Color::DarkCyan,
        Color::White => term_style::Color::Grey,
        Color::BrightBlack => term_style::Color::DarkGrey,
        Color::BrightRed => term_style::Color::Red,
        Color::BrightGreen => term_style::Color::Green,
        Color::BrightYellow => term_style::Color::Yellow,
        Color::BrightBlue => term_style::Color::Blue,
        Color::BrightMagenta => term_style::Color::Magenta,
        Color::BrightCyan => term_style::Color::Cyan,
        Color::BrightWhite => term_style::Color::White,
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_mapping() {
        assert_eq!(to_term_color(Color::Default), term_style::Color::Reset);
        assert_eq!(to_term_color(Color::Red), term_style::Color::DarkRed);
        assert_eq!(to_term_color(Color::BrightBlack), term_style::Color::DarkGrey);
        assert_eq!(to_term_color(Color::BrightWhite), term_style::Color::White);
    }
}
