//! Syntax and styling module
//!
//! Pure token pipeline shared by the editor decorations and the token table:
//! - displayability filtering
//! - classification into style categories
//! - coordinate mapping into display ranges

mod category;
mod filter;
mod range;
mod style;

pub use category::{classify, StyleCategory};
pub use filter::{displayable, is_displayable};
pub use range::{map_range, DisplayRange};
pub use style::{Color, Style};
