use crate::math::Vec2;
use crate::text::{GlyphId, RunStyle, TextEncoding};

/// Maps characters to glyph ids.
pub trait Typeface {
    /// Number of glyphs the typeface defines. Valid glyph ids are
    /// `0..glyph_count()`.
    fn glyph_count(&self) -> u32;

    /// Decodes `text` and writes one glyph id per code point into `out`.
    ///
    /// `out` has exactly as many elements as `text` has code points.
    /// Characters without a glyph map to `0`. `encoding` is never
    /// [`TextEncoding::GlyphId`].
    fn chars_to_glyphs(&self, text: &[u8], encoding: TextEncoding, out: &mut [GlyphId]);
}

/// Looks up glyph advances.
///
/// Implementations which cache internally do so behind `&self`.
pub trait GlyphMetrics {
    /// Writes the advance of each glyph in `glyph_ids` into the matching
    /// element of `out`, for the typeface and size in `style`.
    fn advances(&self, style: &RunStyle, glyph_ids: &[GlyphId], out: &mut [Vec2]);
}

impl<T: Typeface + ?Sized> Typeface for &T {
    fn glyph_count(&self) -> u32 {
        (**self).glyph_count()
    }

    fn chars_to_glyphs(&self, text: &[u8], encoding: TextEncoding, out: &mut [GlyphId]) {
        (**self).chars_to_glyphs(text, encoding, out)
    }
}

impl<T: GlyphMetrics + ?Sized> GlyphMetrics for &T {
    fn advances(&self, style: &RunStyle, glyph_ids: &[GlyphId], out: &mut [Vec2]) {
        (**self).advances(style, glyph_ids, out)
    }
}
