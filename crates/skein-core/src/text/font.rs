use std::borrow::Cow;

use smallvec::{smallvec, SmallVec};

/// Opaque identity of a typeface, assigned by whatever loaded it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TypefaceId(pub u64);

impl TypefaceId {
    pub const DUMMY: TypefaceId = TypefaceId(u64::MAX);
}

/// Attributes used to look a typeface up in a font source.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct FontAttrs {
    pub families: FontFamilies,
    pub weight: FontWeight,
    pub width: FontWidth,
    pub style: FontStyle,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FontFamily {
    name: Cow<'static, str>,
}

impl FontFamily {
    pub fn new(name: impl Into<Cow<'static, str>>) -> FontFamily {
        FontFamily { name: name.into() }
    }

    pub fn serif() -> FontFamily {
        FontFamily::new("serif")
    }

    pub fn sans_serif() -> FontFamily {
        FontFamily::new("sans-serif")
    }

    pub fn cursive() -> FontFamily {
        FontFamily::new("cursive")
    }

    pub fn fantasy() -> FontFamily {
        FontFamily::new("fantasy")
    }

    pub fn monospace() -> FontFamily {
        FontFamily::new("monospace")
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        FontFamily::sans_serif()
    }
}

/// Family names in order of preference. Only used to pick a typeface for a
/// whole run, never per glyph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FontFamilies {
    list: SmallVec<[FontFamily; 2]>,
}

impl FontFamilies {
    pub fn new(base: FontFamily) -> FontFamilies {
        FontFamilies {
            list: smallvec![base],
        }
    }

    pub fn with(mut self, family: FontFamily) -> Self {
        self.list.push(family);
        self
    }

    pub fn base(&self) -> &FontFamily {
        &self.list[0]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontFamily> + '_ {
        self.list.iter()
    }
}

impl From<FontFamily> for FontFamilies {
    fn from(v: FontFamily) -> FontFamilies {
        FontFamilies::new(v)
    }
}

impl Default for FontFamilies {
    fn default() -> FontFamilies {
        FontFamilies::new(FontFamily::default())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const EXTRA_LIGHT: FontWeight = FontWeight(200);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
    pub const BLACK: FontWeight = FontWeight(900);
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum FontWidth {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}
