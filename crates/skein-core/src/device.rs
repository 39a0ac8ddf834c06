use crate::math::Vec2;
use crate::text::{glyph_ids_from_bytes, GlyphId, RunStyle, TypefaceId};

/// Something that draws positioned glyphs, e.g. a rasterizer.
pub trait Device {
    /// Draws the glyphs in `glyph_ids` (native-endian pairs of bytes) at
    /// `positions`, which holds `scalars_per_position` scalars per glyph,
    /// offset by `origin`.
    ///
    /// With one scalar per position, every glyph shares `origin.y`.
    fn draw_pos_text(
        &mut self,
        glyph_ids: &[u8],
        positions: &[f32],
        scalars_per_position: usize,
        origin: Vec2,
        style: &RunStyle,
    );
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawGlyph {
    pub pos: Vec2,
    pub size: f32,
    pub typeface: TypefaceId,
    pub glyph: GlyphId,
}

/// A [`Device`] which records one [`DrawGlyph`] command per glyph.
#[derive(Debug, Clone, Default)]
pub struct GlyphCommandDevice {
    commands: Vec<DrawGlyph>,
}

impl GlyphCommandDevice {
    pub fn new() -> GlyphCommandDevice {
        GlyphCommandDevice::default()
    }

    pub fn commands(&self) -> &[DrawGlyph] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Device for GlyphCommandDevice {
    fn draw_pos_text(
        &mut self,
        glyph_ids: &[u8],
        positions: &[f32],
        scalars_per_position: usize,
        origin: Vec2,
        style: &RunStyle,
    ) {
        debug_assert!(scalars_per_position == 1 || scalars_per_position == 2);

        let positions = positions.chunks_exact(scalars_per_position.max(1));
        let glyphs = glyph_ids_from_bytes(glyph_ids).zip(positions);

        self.commands.extend(glyphs.map(|(glyph, pos)| {
            let pos = match *pos {
                [x] => Vec2::new(x, 0.0),
                [x, y, ..] => Vec2::new(x, y),
                [] => Vec2::ZERO,
            };

            DrawGlyph {
                pos: origin + pos,
                size: style.size,
                typeface: style.typeface,
                glyph,
            }
        }));
    }
}
