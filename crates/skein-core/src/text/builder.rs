use crate::math::Vec2;
use crate::text::{
    glyph_ids_from_bytes, GlyphId, GlyphIdSet, GlyphMetrics, GlyphRun, RunStyle, TextAlign,
    TextEncoding, Typeface,
};

/// Prepares [`GlyphRun`]s, reusing its buffers from one run to the next.
///
/// Each `prepare_*` call replaces the current run, which is then available
/// through [`GlyphRunBuilder::current_run`]. Empty text (or text which can't
/// be decoded) leaves no current run; that is not an error, there's just
/// nothing to draw.
///
/// The builder is meant to be long lived: buffers only grow, to the size of
/// the largest run seen so far.
#[derive(Debug, Default)]
pub struct GlyphRunBuilder {
    max_total_run_size: usize,
    unique_glyph_id_indices: Vec<u16>,
    positions: Vec<Vec2>,
    unique_glyph_ids: Vec<GlyphId>,
    advances: Vec<Vec2>,
    scratch_glyph_ids: Vec<GlyphId>,
    scratch_text: Vec<u8>,
    scratch_clusters: Vec<u32>,
    glyph_id_set: GlyphIdSet,
    slot: Option<RunSlot>,
}

/// The current run, described by how much of each buffer it covers.
#[derive(Debug)]
struct RunSlot {
    style: RunStyle,
    len: usize,
    /// Zero if dense indices aren't part of the run.
    unique_len: usize,
    text_len: usize,
    clusters_len: usize,
}

impl GlyphRunBuilder {
    pub fn new() -> GlyphRunBuilder {
        GlyphRunBuilder::default()
    }

    /// Creates a builder whose [`GlyphIdSet`] uses the provided ceiling.
    pub fn with_glyph_id_set(glyph_id_set: GlyphIdSet) -> GlyphRunBuilder {
        GlyphRunBuilder {
            glyph_id_set,
            ..Default::default()
        }
    }

    /// Lays `text` out left to right from `origin`, advancing the pen by each
    /// glyph's advance, then shifts the whole run according to
    /// `style.align`.
    ///
    /// Advances are requested once per distinct glyph.
    pub fn prepare_text(
        &mut self,
        typeface: &dyn Typeface,
        metrics: &dyn GlyphMetrics,
        style: &RunStyle,
        text: &[u8],
        origin: Vec2,
    ) {
        let run_size = self.text_to_glyph_ids(typeface, style, text);
        if run_size == 0 {
            self.slot = None;
            return;
        }

        self.initialize(run_size);
        self.draw_text(typeface, metrics, style, run_size, origin);
    }

    /// Places glyph `i` of `text` at `(xpos[i], const_y)`.
    ///
    /// `xpos` must have an element for every glyph.
    pub fn prepare_positioned_h(
        &mut self,
        typeface: &dyn Typeface,
        style: &RunStyle,
        text: &[u8],
        xpos: &[f32],
        const_y: f32,
    ) {
        let run_size = self.text_to_glyph_ids(typeface, style, text);
        if run_size == 0 {
            self.slot = None;
            return;
        }

        self.initialize(run_size);
        self.draw_pos_text_h(typeface, style, run_size, xpos, const_y);
    }

    /// Places glyph `i` of `text` at `positions[i]`.
    ///
    /// `positions` must have an element for every glyph.
    pub fn prepare_positioned(
        &mut self,
        typeface: &dyn Typeface,
        style: &RunStyle,
        text: &[u8],
        positions: &[Vec2],
    ) {
        let run_size = self.text_to_glyph_ids(typeface, style, text);
        if run_size == 0 {
            self.slot = None;
            return;
        }

        self.initialize(run_size);
        self.draw_pos_text(typeface, style, run_size, positions, 0, 0);
    }

    /// Prepares a run which is already made of glyph ids and positions,
    /// keeping the text it was shaped from and the byte offset of every glyph
    /// into that text.
    ///
    /// `positions`, and `clusters` unless it's empty, must have the same
    /// length as `glyph_ids`. `style.encoding` is ignored.
    pub fn prepare_shaped(
        &mut self,
        typeface: &dyn Typeface,
        style: &RunStyle,
        glyph_ids: &[GlyphId],
        positions: &[Vec2],
        text: &[u8],
        clusters: &[u32],
    ) {
        debug_assert_eq!(positions.len(), glyph_ids.len());
        debug_assert!(clusters.is_empty() || clusters.len() == glyph_ids.len());

        let run_size = glyph_ids.len();
        if run_size == 0 {
            self.slot = None;
            return;
        }

        self.reserve_scratch_glyph_ids(run_size);
        self.scratch_glyph_ids[..run_size].copy_from_slice(glyph_ids);

        self.initialize(run_size);

        self.scratch_text.clear();
        self.scratch_text.extend_from_slice(text);
        self.scratch_clusters.clear();
        self.scratch_clusters.extend_from_slice(clusters);

        self.draw_pos_text(
            typeface,
            style,
            run_size,
            positions,
            text.len(),
            clusters.len(),
        );
    }

    /// The run prepared by the last `prepare_*` call, if it had any glyphs.
    pub fn current_run(&self) -> Option<GlyphRun<'_>> {
        let slot = self.slot.as_ref()?;

        let (unique_glyph_ids, unique_glyph_id_indices) = if slot.unique_len > 0 {
            (
                &self.unique_glyph_ids[..slot.unique_len],
                &self.unique_glyph_id_indices[..slot.len],
            )
        } else {
            (&[][..], &[][..])
        };

        Some(GlyphRun::new(
            &slot.style,
            &self.positions[..slot.len],
            &self.scratch_glyph_ids[..slot.len],
            unique_glyph_ids,
            unique_glyph_id_indices,
            &self.scratch_text[..slot.text_len],
            &self.scratch_clusters[..slot.clusters_len],
        ))
    }

    /// Size of the largest run prepared so far.
    pub fn max_total_run_size(&self) -> usize {
        self.max_total_run_size
    }

    pub fn glyph_id_set(&self) -> &GlyphIdSet {
        &self.glyph_id_set
    }

    /// Converts `text` into glyph ids in the staging buffer and returns how
    /// many there are.
    fn text_to_glyph_ids(
        &mut self,
        typeface: &dyn Typeface,
        style: &RunStyle,
        text: &[u8],
    ) -> usize {
        let run_size = match style.encoding.count_chars(text) {
            Some(v) if v > 0 => v,
            _ => return 0,
        };

        self.reserve_scratch_glyph_ids(run_size);
        let glyph_ids = &mut self.scratch_glyph_ids[..run_size];

        match style.encoding {
            TextEncoding::GlyphId => {
                for (dst, glyph_id) in glyph_ids.iter_mut().zip(glyph_ids_from_bytes(text)) {
                    *dst = glyph_id;
                }
            }
            encoding => typeface.chars_to_glyphs(text, encoding, glyph_ids),
        }

        run_size
    }

    fn reserve_scratch_glyph_ids(&mut self, run_size: usize) {
        if self.scratch_glyph_ids.len() < run_size {
            self.scratch_glyph_ids.resize(run_size, 0);
        }
    }

    /// Makes room for a run of `total_run_size` glyphs and drops the current
    /// run. Must happen before the run's buffers are written.
    fn initialize(&mut self, total_run_size: usize) {
        self.slot = None;

        if total_run_size > self.max_total_run_size {
            log::trace!(
                "Glyph run buffers growing from {} to {} glyphs",
                self.max_total_run_size,
                total_run_size
            );

            self.max_total_run_size = total_run_size;
            self.unique_glyph_id_indices.resize(total_run_size, 0);
            self.positions.resize(total_run_size, Vec2::ZERO);
            self.unique_glyph_ids.resize(total_run_size, 0);
        }
    }

    /// Deduplicates the first `run_size` staged glyph ids and returns the
    /// number of unique ones, or zero if the typeface has no glyphs to
    /// deduplicate against.
    fn add_dense_and_unique(&mut self, typeface: &dyn Typeface, run_size: usize) -> usize {
        let universe_size = typeface.glyph_count();
        if run_size == 0 || universe_size == 0 {
            return 0;
        }

        let GlyphRunBuilder {
            glyph_id_set,
            scratch_glyph_ids,
            unique_glyph_ids,
            unique_glyph_id_indices,
            ..
        } = self;

        glyph_id_set
            .uniquify(
                universe_size,
                &scratch_glyph_ids[..run_size],
                unique_glyph_ids,
                unique_glyph_id_indices,
            )
            .len()
    }

    fn draw_text(
        &mut self,
        typeface: &dyn Typeface,
        metrics: &dyn GlyphMetrics,
        style: &RunStyle,
        run_size: usize,
        origin: Vec2,
    ) {
        debug_assert!(run_size > 0);

        let unique_len = self.add_dense_and_unique(typeface, run_size);

        if self.advances.len() < run_size {
            self.advances.resize(run_size, Vec2::ZERO);
        }

        let positions = &mut self.positions[..run_size];
        let mut cursor = origin;

        if unique_len > 0 {
            let advances = &mut self.advances[..unique_len];
            metrics.advances(style, &self.unique_glyph_ids[..unique_len], advances);

            let indices = &self.unique_glyph_id_indices[..run_size];
            for (pos, &index) in positions.iter_mut().zip(indices) {
                *pos = cursor;
                cursor += advances[index as usize];
            }
        } else {
            // nothing to deduplicate against, ask for every glyph
            let advances = &mut self.advances[..run_size];
            metrics.advances(style, &self.scratch_glyph_ids[..run_size], advances);

            for (pos, &advance) in positions.iter_mut().zip(advances.iter()) {
                *pos = cursor;
                cursor += advance;
            }
        }

        let factor = style.align.factor();
        if factor != 0.0 {
            let delta = (cursor - origin) * factor;
            for pos in positions.iter_mut() {
                *pos -= delta;
            }
        }

        self.make_glyph_run(style, run_size, unique_len, 0, 0);
    }

    fn draw_pos_text_h(
        &mut self,
        typeface: &dyn Typeface,
        style: &RunStyle,
        run_size: usize,
        xpos: &[f32],
        const_y: f32,
    ) {
        debug_assert!(run_size > 0);
        debug_assert!(xpos.len() >= run_size);

        // dense indices are only checked here, positions don't need them
        if cfg!(debug_assertions) {
            self.add_dense_and_unique(typeface, run_size);
        }

        let positions = &mut self.positions[..run_size];
        for (pos, &x) in positions.iter_mut().zip(&xpos[..run_size]) {
            *pos = Vec2::new(x, const_y);
        }

        self.make_glyph_run(style, run_size, 0, 0, 0);
    }

    fn draw_pos_text(
        &mut self,
        typeface: &dyn Typeface,
        style: &RunStyle,
        run_size: usize,
        positions: &[Vec2],
        text_len: usize,
        clusters_len: usize,
    ) {
        debug_assert!(run_size > 0);
        debug_assert!(positions.len() >= run_size);

        if cfg!(debug_assertions) {
            self.add_dense_and_unique(typeface, run_size);
        }

        self.positions[..run_size].copy_from_slice(&positions[..run_size]);

        self.make_glyph_run(style, run_size, 0, text_len, clusters_len);
    }

    fn make_glyph_run(
        &mut self,
        style: &RunStyle,
        run_size: usize,
        unique_len: usize,
        text_len: usize,
        clusters_len: usize,
    ) {
        if run_size == 0 {
            return;
        }

        let style = RunStyle {
            encoding: TextEncoding::GlyphId,
            align: TextAlign::Left,
            ..style.clone()
        };

        self.slot = Some(RunSlot {
            style,
            len: run_size,
            unique_len,
            text_len,
            clusters_len,
        });
    }
}
