//! Decoration building and synchronization
//!
//! The synchronizer is the only place that touches the surface's decoration
//! set. Each accepted analysis replaces the previous set wholesale.

use tracing::debug;

use crate::surface::EditorSurface;
use crate::syntax::{classify, displayable, map_range, DisplayRange, StyleCategory};
use crate::token::Token;

/// A highlighted range on the editor surface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decoration {
    pub range: DisplayRange,
    pub category: StyleCategory,
}

impl Decoration {
    pub fn new(range: DisplayRange, category: StyleCategory) -> Self {
        Self { range, category }
    }
}

/// Opaque id of an installed decoration, issued by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationHandle(pub u64);

/// Build the full decoration list for a token stream, in token order
pub fn build_decorations(tokens: &[Token]) -> Vec<Decoration> {
    displayable(tokens)
        .map(|token| Decoration::new(map_range(token), classify(&token.kind)))
        .collect()
}

/// Replace the surface's decorations with those derived from `tokens`
///
/// Always issues exactly one replace call, even when the new set equals the
/// old one.
pub fn sync(
    surface: &mut dyn EditorSurface,
    tokens: &[Token],
    previous: &[DecorationHandle],
) -> Vec<DecorationHandle> {
    let decorations = build_decorations(tokens);
    debug!(
        removed = previous.len(),
        installed = decorations.len(),
        "replacing decorations"
    );
    surface.replace_decorations(previous, &decorations)
}
