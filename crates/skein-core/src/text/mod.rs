mod builder;
mod encoding;
mod font;
mod glyph_id_set;
mod glyph_run;
mod metrics_cache;
mod typeface;

pub use self::builder::*;
pub use self::encoding::*;
pub use self::font::*;
pub use self::glyph_id_set::*;
pub use self::glyph_run::*;
pub use self::metrics_cache::*;
pub use self::typeface::*;

/// A glyph identifier, scoped to one typeface.
pub type GlyphId = u16;

/// Everything needed to shape and draw one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStyle {
    /// Font size in pixels per em.
    pub size: f32,
    pub align: TextAlign,
    /// How the bytes passed to the builder are to be interpreted.
    pub encoding: TextEncoding,
    pub typeface: TypefaceId,
}

impl Default for RunStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            align: Default::default(),
            encoding: Default::default(),
            typeface: TypefaceId::DUMMY,
        }
    }
}

/// Horizontal alignment of a run relative to its origin.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum TextAlign {
    Start,
    #[default]
    Left,
    Center,
    End,
    Right,
}

impl TextAlign {
    /// Fraction of the total advance a run is shifted back by.
    pub fn factor(self) -> f32 {
        match self {
            TextAlign::Start | TextAlign::Left => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::End | TextAlign::Right => 1.0,
        }
    }
}
