use std::cell::RefCell;
use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::math::Vec2;
use crate::text::{GlyphId, GlyphMetrics, RunStyle, TypefaceId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct AdvanceKey {
    typeface: TypefaceId,
    size: u32,
    glyph: GlyphId,
}

/// Remembers advances reported by another [`GlyphMetrics`], per typeface,
/// size and glyph. Only missing advances are forwarded, in a single batch.
pub struct CachedMetrics<M> {
    inner: M,
    state: RefCell<CacheState>,
}

struct CacheState {
    advances: LruCache<AdvanceKey, Vec2>,
    missing: Vec<GlyphId>,
    missing_advances: Vec<Vec2>,
}

impl<M: GlyphMetrics> CachedMetrics<M> {
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(4096) {
        Some(v) => v,
        None => panic!(),
    };

    pub fn new(inner: M) -> CachedMetrics<M> {
        CachedMetrics::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: M, capacity: NonZeroUsize) -> CachedMetrics<M> {
        CachedMetrics {
            inner,
            state: RefCell::new(CacheState {
                advances: LruCache::new(capacity),
                missing: Vec::new(),
                missing_advances: Vec::new(),
            }),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Number of cached advances.
    pub fn len(&self) -> usize {
        self.state.borrow().advances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state.borrow_mut().advances.clear();
    }
}

impl<M: GlyphMetrics> GlyphMetrics for CachedMetrics<M> {
    fn advances(&self, style: &RunStyle, glyph_ids: &[GlyphId], out: &mut [Vec2]) {
        let mut state = self.state.borrow_mut();
        let CacheState {
            advances,
            missing,
            missing_advances,
        } = &mut *state;

        let key = |glyph| AdvanceKey {
            typeface: style.typeface,
            size: style.size.to_bits(),
            glyph,
        };

        missing.clear();
        for (&glyph, advance) in glyph_ids.iter().zip(out.iter_mut()) {
            match advances.get(&key(glyph)) {
                Some(&cached) => *advance = cached,
                None => missing.push(glyph),
            }
        }

        if missing.is_empty() {
            return;
        }

        missing_advances.clear();
        missing_advances.resize(missing.len(), Vec2::ZERO);
        self.inner.advances(style, missing, missing_advances);

        for (&glyph, &advance) in missing.iter().zip(missing_advances.iter()) {
            advances.put(key(glyph), advance);
        }

        // second pass fills what the first one skipped; the cache may be
        // smaller than the request, so look missing glyphs up in the batch
        let mut fetched = missing.iter().zip(missing_advances.iter()).peekable();
        for (&glyph, advance) in glyph_ids.iter().zip(out.iter_mut()) {
            if let Some(&(&next, &value)) = fetched.peek() {
                if next == glyph {
                    *advance = value;
                    fetched.next();
                }
            }
        }
    }
}

impl<M> fmt::Debug for CachedMetrics<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedMetrics").finish_non_exhaustive()
    }
}
