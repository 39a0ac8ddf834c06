use crate::text::GlyphId;

/// Deduplicates glyph ids of a typeface in time proportional to the number of
/// ids, not the number of glyphs in the typeface.
///
/// This is the sparse set of Briggs and Torczon ("An Efficient Representation
/// for Sparse Sets"). The map from glyph id to dense index is never cleared
/// between calls: an entry is only trusted if it points inside the unique
/// ids produced by the *current* call and the unique id it points at is the
/// glyph being looked up. Stale entries left by earlier calls fail that check
/// and are simply overwritten.
#[derive(Debug, Clone)]
pub struct GlyphIdSet {
    universe_to_unique: Vec<u16>,
    ceiling: usize,
}

impl GlyphIdSet {
    /// Size the map is shrunk back to after serving a larger typeface. It's
    /// unusual to see a typeface with more glyphs than this.
    pub const DEFAULT_CEILING: usize = 4096;

    /// Out-of-range glyph ids are replaced with this one.
    pub const UNDEFINED_GLYPH: GlyphId = 0;

    const MAX_UNIVERSE: usize = GlyphId::MAX as usize + 1;

    pub fn new() -> GlyphIdSet {
        GlyphIdSet::with_ceiling(Self::DEFAULT_CEILING)
    }

    /// Creates a set which keeps at most `ceiling` map entries between calls.
    pub fn with_ceiling(ceiling: usize) -> GlyphIdSet {
        GlyphIdSet {
            universe_to_unique: Vec::new(),
            ceiling,
        }
    }

    /// Current size of the glyph id to dense index map.
    pub fn universe_len(&self) -> usize {
        self.universe_to_unique.len()
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Writes the distinct ids of `glyph_ids` into `unique_glyph_ids`, in order
    /// of first occurrence, and for every element of `glyph_ids` the index of
    /// its unique id into `dense_indices`. Returns the filled prefix of
    /// `unique_glyph_ids`.
    ///
    /// Ids not below `universe_size` are treated as [`Self::UNDEFINED_GLYPH`].
    /// A `universe_size` of zero means there is nothing to deduplicate
    /// against: the outputs are left untouched and the result is empty.
    ///
    /// Both output slices must be at least as long as `glyph_ids`.
    pub fn uniquify<'u>(
        &mut self,
        universe_size: u32,
        glyph_ids: &[GlyphId],
        unique_glyph_ids: &'u mut [GlyphId],
        dense_indices: &mut [u16],
    ) -> &'u [GlyphId] {
        debug_assert!(unique_glyph_ids.len() >= glyph_ids.len());
        debug_assert!(dense_indices.len() >= glyph_ids.len());

        if universe_size == 0 {
            return &[];
        }

        let universe = (universe_size as usize).min(Self::MAX_UNIVERSE);
        self.reserve_universe(universe);

        let mut unique_len = 0;

        for (&glyph_id, dense_index) in glyph_ids.iter().zip(dense_indices.iter_mut()) {
            let glyph_id = if (glyph_id as usize) < universe {
                glyph_id
            } else {
                Self::UNDEFINED_GLYPH
            };

            let mut unique_index = self.universe_to_unique[glyph_id as usize];

            if unique_index as usize >= unique_len
                || unique_glyph_ids[unique_index as usize] != glyph_id
            {
                // unique_len <= universe <= 2^16, so the index fits
                unique_index = unique_len as u16;
                unique_glyph_ids[unique_len] = glyph_id;
                self.universe_to_unique[glyph_id as usize] = unique_index;
                unique_len += 1;
            }

            *dense_index = unique_index;
        }

        self.shrink_to_ceiling();

        &unique_glyph_ids[..unique_len]
    }

    fn reserve_universe(&mut self, universe: usize) {
        if universe <= self.universe_to_unique.len() {
            return;
        }

        log::debug!(
            "Glyph id set growing from {} to {} entries",
            self.universe_to_unique.len(),
            universe
        );

        // a fresh allocation; old entries would be overwritten anyway
        self.universe_to_unique.clear();
        self.universe_to_unique.resize(universe, 0);
    }

    fn shrink_to_ceiling(&mut self) {
        if self.universe_to_unique.len() <= self.ceiling {
            return;
        }

        log::debug!(
            "Glyph id set shrinking from {} to {} entries",
            self.universe_to_unique.len(),
            self.ceiling
        );

        self.universe_to_unique.truncate(self.ceiling);
        self.universe_to_unique.shrink_to_fit();
    }
}

impl Default for GlyphIdSet {
    fn default() -> Self {
        GlyphIdSet::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniquify(
        set: &mut GlyphIdSet,
        universe_size: u32,
        glyph_ids: &[GlyphId],
    ) -> (Vec<GlyphId>, Vec<u16>) {
        let mut unique = vec![0xdead; glyph_ids.len()];
        let mut dense = vec![0xbeef; glyph_ids.len()];
        let unique_len = set
            .uniquify(universe_size, glyph_ids, &mut unique, &mut dense)
            .len();
        unique.truncate(unique_len);
        (unique, dense)
    }

    fn check_dedup(
        universe_size: u32,
        glyph_ids: &[GlyphId],
        unique: &[GlyphId],
        dense: &[u16],
    ) {
        assert!(unique.len() <= glyph_ids.len());
        assert_eq!(dense.len(), glyph_ids.len());

        for (i, &a) in unique.iter().enumerate() {
            assert!(!unique[i + 1..].contains(&a), "{a} is duplicated");
        }

        for (&id, &index) in glyph_ids.iter().zip(dense) {
            let expected = if (id as u32) < universe_size { id } else { 0 };
            assert_eq!(unique[index as usize], expected);
        }
    }

    #[test]
    fn dedups_in_order_of_first_occurrence() {
        let mut set = GlyphIdSet::new();
        let (unique, dense) = uniquify(&mut set, 100, &[5, 7, 5, 9, 7, 7]);

        assert_eq!(unique, [5, 7, 9]);
        assert_eq!(dense, [0, 1, 0, 2, 1, 1]);
    }

    #[test]
    fn duplicate_free_input_is_unchanged() {
        let mut set = GlyphIdSet::new();
        let ids = [3, 1, 4, 15, 9, 2, 6];
        let (unique, dense) = uniquify(&mut set, 16, &ids);

        assert_eq!(unique, ids);
        assert_eq!(dense, [0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn out_of_range_ids_collapse_onto_undefined_glyph() {
        let mut set = GlyphIdSet::new();
        let (unique, dense) = uniquify(&mut set, 10, &[3, 10, 0, 500, 3]);

        assert_eq!(unique, [3, 0]);
        assert_eq!(dense, [0, 1, 1, 1, 0]);
    }

    #[test]
    fn zero_universe_leaves_outputs_untouched() {
        let mut set = GlyphIdSet::new();
        let (unique, dense) = uniquify(&mut set, 0, &[1, 2, 3]);

        assert!(unique.is_empty());
        assert_eq!(dense, [0xbeef; 3]);
        assert_eq!(set.universe_len(), 0);
    }

    #[test]
    fn empty_input() {
        let mut set = GlyphIdSet::new();
        let (unique, dense) = uniquify(&mut set, 10, &[]);

        assert!(unique.is_empty());
        assert!(dense.is_empty());
    }

    #[test]
    fn grows_to_the_requested_universe() {
        let mut set = GlyphIdSet::new();
        uniquify(&mut set, 300, &[1]);
        assert_eq!(set.universe_len(), 300);

        // smaller universes reuse the existing map
        uniquify(&mut set, 20, &[1]);
        assert_eq!(set.universe_len(), 300);
    }

    #[test]
    fn shrinks_back_to_ceiling() {
        let mut set = GlyphIdSet::new();
        let ids = [0, 4095, 4096, 60000, 4096];
        let (unique, dense) = uniquify(&mut set, 65535, &ids);

        assert_eq!(unique, [0, 4095, 4096, 60000]);
        assert_eq!(dense, [0, 1, 2, 3, 2]);
        assert!(set.universe_len() <= GlyphIdSet::DEFAULT_CEILING);
    }

    #[test]
    fn custom_ceiling() {
        let mut set = GlyphIdSet::with_ceiling(16);
        uniquify(&mut set, 64, &[40, 41, 40]);
        assert_eq!(set.universe_len(), 16);
        assert_eq!(set.ceiling(), 16);
    }

    #[test]
    fn universe_is_clamped_to_id_space() {
        let mut set = GlyphIdSet::with_ceiling(usize::MAX);
        let (unique, _) = uniquify(&mut set, u32::MAX, &[GlyphId::MAX, 1]);

        assert_eq!(unique, [GlyphId::MAX, 1]);
        assert_eq!(set.universe_len(), 1 << 16);
    }

    #[test]
    fn stale_entries_do_not_leak_between_calls() {
        let mut set = GlyphIdSet::new();

        // leaves 9 -> 0, 8 -> 1, 7 -> 2 behind
        uniquify(&mut set, 10, &[9, 8, 7]);

        // 7's stale entry points at index 2, which is out of range for this call
        let (unique, dense) = uniquify(&mut set, 10, &[7, 7]);
        assert_eq!(unique, [7]);
        assert_eq!(dense, [0, 0]);

        // 8's stale entry points at index 1, which now holds a different id
        let (unique, dense) = uniquify(&mut set, 10, &[2, 3, 8]);
        assert_eq!(unique, [2, 3, 8]);
        assert_eq!(dense, [0, 1, 2]);
    }

    #[test]
    fn reused_set_matches_fresh_set() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut reused = GlyphIdSet::with_ceiling(64);

        for _ in 0..500 {
            let universe_size = rng.u32(0..200);
            let len = rng.usize(0..64);
            let ids = (0..len).map(|_| rng.u16(0..256)).collect::<Vec<_>>();

            let (unique, dense) = uniquify(&mut reused, universe_size, &ids);
            let mut fresh = GlyphIdSet::new();
            let (fresh_unique, fresh_dense) = uniquify(&mut fresh, universe_size, &ids);

            assert_eq!(unique, fresh_unique);
            if universe_size > 0 {
                assert_eq!(dense, fresh_dense);
                check_dedup(universe_size, &ids, &unique, &dense);
            }
            assert!(reused.universe_len() <= 64);
        }
    }
}
