use std::fmt;
use std::sync::Arc;

use skein_core::math::Vec2;
use skein_core::text::{
    FontAttrs, FontFamily, FontStyle, FontWeight, FontWidth, GlyphId, GlyphMetrics, RunStyle,
    TextEncoding, Typeface, TypefaceId,
};
use skein_core::{Error, ErrorKind, Result};
use ttf_parser::{name_id, Face, Language};

self_cell::self_cell! {
    struct FaceRef {
        owner: Arc<dyn AsRef<[u8]> + Send + Sync>,
        #[covariant]
        dependent: Face,
    }
}

/// A typeface parsed with `ttf-parser`, providing both glyph lookup and
/// horizontal advances.
pub struct TtfTypeface {
    id: TypefaceId,
    face_ref: FaceRef,
    face_index: u32,
    attrs: FontAttrs,
}

impl TtfTypeface {
    pub fn new(
        id: TypefaceId,
        data: Arc<dyn AsRef<[u8]> + Send + Sync>,
        face_index: u32,
    ) -> Result<TtfTypeface> {
        let face_ref = FaceRef::try_new(data, |data| Face::parse((**data).as_ref(), face_index))
            .map_err(|e| Error::wrap(ErrorKind::InvalidFont, e))?;

        let attrs = font_attrs(face_ref.borrow_dependent())
            .ok_or_else(|| Error::new(ErrorKind::InvalidFont, "font has no family name"))?;

        Ok(TtfTypeface {
            id,
            face_ref,
            face_index,
            attrs,
        })
    }

    pub fn id(&self) -> TypefaceId {
        self.id
    }

    pub fn data(&self) -> &Arc<dyn AsRef<[u8]> + Send + Sync> {
        self.face_ref.borrow_owner()
    }

    pub fn ttfp_face(&self) -> &Face<'_> {
        self.face_ref.borrow_dependent()
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn attrs(&self) -> &FontAttrs {
        &self.attrs
    }

    pub fn units_per_em(&self) -> u16 {
        self.ttfp_face().units_per_em()
    }
}

impl Typeface for TtfTypeface {
    fn glyph_count(&self) -> u32 {
        self.ttfp_face().number_of_glyphs().into()
    }

    fn chars_to_glyphs(&self, text: &[u8], encoding: TextEncoding, out: &mut [GlyphId]) {
        let face = self.ttfp_face();
        for (dst, c) in out.iter_mut().zip(encoding.chars(text)) {
            *dst = face.glyph_index(c).map_or(0, |g| g.0);
        }
    }
}

impl GlyphMetrics for TtfTypeface {
    fn advances(&self, style: &RunStyle, glyph_ids: &[GlyphId], out: &mut [Vec2]) {
        let face = self.ttfp_face();
        let scale = style.size / face.units_per_em().max(1) as f32;

        for (&glyph, advance) in glyph_ids.iter().zip(out) {
            let units = face
                .glyph_hor_advance(ttf_parser::GlyphId(glyph))
                .unwrap_or(0);
            *advance = Vec2::new(units as f32 * scale, 0.0);
        }
    }
}

impl fmt::Debug for TtfTypeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfTypeface")
            .field("id", &self.id)
            .field("face_index", &self.face_index)
            .field("attrs", &self.attrs)
            .finish_non_exhaustive()
    }
}

fn font_attrs(face: &Face<'_>) -> Option<FontAttrs> {
    Some(FontAttrs {
        families: get_font_family(face)?.into(),
        weight: FontWeight(face.weight().to_number()),
        width: get_font_width(face),
        style: get_font_style(face),
    })
}

fn get_font_family(face: &Face<'_>) -> Option<FontFamily> {
    face.names()
        .into_iter()
        .filter(|name| {
            name.name_id == name_id::TYPOGRAPHIC_FAMILY || name.name_id == name_id::FAMILY
        })
        .flat_map(|name| {
            name.to_string()
                .map(|str| (name.name_id, str, name.language()))
        })
        .max_by_key(|&(id, _, language)| {
            let mut points = 0;
            if id == name_id::TYPOGRAPHIC_FAMILY {
                points += 10;
            }
            if language == Language::English_UnitedStates {
                points += 10;
            }
            points
        })
        .map(|(_, name, _)| FontFamily::new(name))
}

fn get_font_width(face: &Face<'_>) -> FontWidth {
    match face.width() {
        ttf_parser::Width::UltraCondensed => FontWidth::UltraCondensed,
        ttf_parser::Width::ExtraCondensed => FontWidth::ExtraCondensed,
        ttf_parser::Width::Condensed => FontWidth::Condensed,
        ttf_parser::Width::SemiCondensed => FontWidth::SemiCondensed,
        ttf_parser::Width::Normal => FontWidth::Normal,
        ttf_parser::Width::SemiExpanded => FontWidth::SemiExpanded,
        ttf_parser::Width::Expanded => FontWidth::Expanded,
        ttf_parser::Width::ExtraExpanded => FontWidth::ExtraExpanded,
        ttf_parser::Width::UltraExpanded => FontWidth::UltraExpanded,
    }
}

fn get_font_style(face: &Face<'_>) -> FontStyle {
    match face.style() {
        ttf_parser::Style::Normal => FontStyle::Normal,
        ttf_parser::Style::Italic => FontStyle::Italic,
        ttf_parser::Style::Oblique => FontStyle::Oblique,
    }
}
