//! Glyph run preparation.
//!
//! A [`GlyphRunBuilder`](text::GlyphRunBuilder) turns a run of text (or
//! already resolved glyph ids) and a [`RunStyle`](text::RunStyle) into a
//! positioned, deduplicated [`GlyphRun`](text::GlyphRun) which can be handed
//! to a [`Device`].

pub mod math;
pub mod text;

mod device;
mod error;

pub use self::device::*;
pub use self::error::*;
