use crate::math::Vec2;
use crate::text::{GlyphId, RunStyle};
use crate::Device;

/// A positioned run of glyphs sharing one style.
///
/// All slices are borrowed from the [`GlyphRunBuilder`](super::GlyphRunBuilder)
/// that produced the run, so the run can't outlive the next call that
/// prepares another one.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRun<'a> {
    style: &'a RunStyle,
    positions: &'a [Vec2],
    glyph_ids: &'a [GlyphId],
    unique_glyph_ids: &'a [GlyphId],
    unique_glyph_id_indices: &'a [u16],
    text: &'a [u8],
    clusters: &'a [u32],
}

impl<'a> GlyphRun<'a> {
    pub(crate) fn new(
        style: &'a RunStyle,
        positions: &'a [Vec2],
        glyph_ids: &'a [GlyphId],
        unique_glyph_ids: &'a [GlyphId],
        unique_glyph_id_indices: &'a [u16],
        text: &'a [u8],
        clusters: &'a [u32],
    ) -> GlyphRun<'a> {
        debug_assert_eq!(positions.len(), glyph_ids.len());
        debug_assert!(
            unique_glyph_id_indices.is_empty()
                || (unique_glyph_id_indices.len() == glyph_ids.len()
                    && unique_glyph_id_indices
                        .iter()
                        .all(|&i| (i as usize) < unique_glyph_ids.len()))
        );
        debug_assert!(clusters.is_empty() || clusters.len() == glyph_ids.len());

        GlyphRun {
            style,
            positions,
            glyph_ids,
            unique_glyph_ids,
            unique_glyph_id_indices,
            text,
            clusters,
        }
    }

    /// Style the run was prepared with. Its encoding is always
    /// [`TextEncoding::GlyphId`](super::TextEncoding::GlyphId) and its
    /// alignment [`TextAlign::Left`](super::TextAlign::Left), since alignment
    /// is already applied to the positions.
    pub fn style(&self) -> &'a RunStyle {
        self.style
    }

    /// Pen position of every glyph.
    pub fn positions(&self) -> &'a [Vec2] {
        self.positions
    }

    pub fn glyph_ids(&self) -> &'a [GlyphId] {
        self.glyph_ids
    }

    /// Distinct glyph ids of the run, in order of first occurrence. Empty
    /// unless the run was laid out from advances.
    pub fn unique_glyph_ids(&self) -> &'a [GlyphId] {
        self.unique_glyph_ids
    }

    /// For every glyph, the index of its id in [`Self::unique_glyph_ids`].
    /// Empty whenever `unique_glyph_ids` is.
    pub fn unique_glyph_id_indices(&self) -> &'a [u16] {
        self.unique_glyph_id_indices
    }

    /// Source text the glyphs were shaped from, if it was provided.
    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    /// Byte offset into [`Self::text`] for every glyph, if provided.
    pub fn clusters(&self) -> &'a [u32] {
        self.clusters
    }

    pub fn len(&self) -> usize {
        self.glyph_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyph_ids.is_empty()
    }

    /// Glyph ids as raw native-endian bytes, two per glyph.
    pub fn glyph_id_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.glyph_ids)
    }

    /// Positions as a flat list of scalars, two per glyph.
    pub fn positions_flat(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.positions)
    }

    /// Hands the run to `device` as positioned glyph id text.
    pub fn draw_to(&self, device: &mut dyn Device) {
        if self.is_empty() {
            return;
        }

        device.draw_pos_text(
            self.glyph_id_bytes(),
            self.positions_flat(),
            2,
            Vec2::ZERO,
            self.style,
        );
    }

    /// Calls `callback` with the glyph count, the glyph id bytes and the flat
    /// positions.
    pub fn shunt_to_callback(&self, mut callback: impl FnMut(usize, &[u8], &[f32])) {
        callback(self.len(), self.glyph_id_bytes(), self.positions_flat());
    }
}
