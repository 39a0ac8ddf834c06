use std::collections::{HashMap, HashSet};
use std::fmt;

use skein_core::text::{FontAttrs, FontFamily, FontStyle, FontWidth, TypefaceId};
use skein_core::{Error, ErrorKind, Result};
use skein_ttf::TtfTypeface;

/// Finds and loads typefaces installed on the system.
///
/// Typeface ids are handed out in the order faces are added to the source.
pub struct SystemFontSource {
    db: fontdb::Database,
    faces: Vec<fontdb::ID>,
    typeface_ids: HashMap<fontdb::ID, TypefaceId>,
    loaded: HashMap<TypefaceId, TtfTypeface>,
    cached_failures: HashSet<TypefaceId>,
}

impl SystemFontSource {
    pub fn new() -> SystemFontSource {
        let mut source = SystemFontSource::empty();
        source.db.load_system_fonts();
        source.assign_ids();
        source
    }

    /// A source without any fonts. Add some with [`Self::load_font_data`].
    pub fn empty() -> SystemFontSource {
        SystemFontSource {
            db: fontdb::Database::new(),
            faces: Vec::new(),
            typeface_ids: HashMap::new(),
            loaded: HashMap::new(),
            cached_failures: HashSet::new(),
        }
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.assign_ids();
    }

    fn assign_ids(&mut self) {
        for face in self.db.faces() {
            if self.typeface_ids.contains_key(&face.id) {
                continue;
            }

            let id = TypefaceId(self.faces.len() as u64);
            self.faces.push(face.id);
            self.typeface_ids.insert(face.id, id);
        }
    }

    /// Number of faces known to the source, loaded or not.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Returns the best match for the first of `attrs.families` that has one.
    pub fn query(&self, attrs: &FontAttrs) -> Option<TypefaceId> {
        attrs.families.iter().find_map(|family| {
            self.db
                .query(&fontdb::Query {
                    families: &[fontdb_family(family)],
                    weight: fontdb::Weight(attrs.weight.0),
                    stretch: fontdb_stretch(attrs.width),
                    style: fontdb_style(attrs.style),
                })
                .and_then(|id| self.typeface_ids.get(&id).copied())
        })
    }

    pub fn load(&mut self, id: TypefaceId) -> Result<&TtfTypeface> {
        if self.cached_failures.contains(&id) {
            return Err(Error::new(ErrorKind::CachedFailure, "cached failure"));
        }

        let typeface = match self.load_uncached(id) {
            Ok(v) => v,
            Err(e) => {
                log::error!("Font failed to load: {}", e);
                self.cached_failures.insert(id);
                return Err(e);
            }
        };

        self.loaded.insert(id, typeface);
        Ok(&self.loaded[&id])
    }

    pub fn get(&self, id: TypefaceId) -> Option<&TtfTypeface> {
        self.loaded.get(&id)
    }

    pub fn get_or_load(&mut self, id: TypefaceId) -> Result<&TtfTypeface> {
        if self.loaded.contains_key(&id) {
            Ok(&self.loaded[&id])
        } else {
            self.load(id)
        }
    }

    fn load_uncached(&mut self, id: TypefaceId) -> Result<TtfTypeface> {
        let fontdb_id = usize::try_from(id.0)
            .ok()
            .and_then(|index| self.faces.get(index).copied())
            .ok_or_else(|| Error::new(ErrorKind::InvalidId, "unknown typeface id"))?;

        let (data, face_index) = unsafe {
            self.db
                .make_shared_face_data(fontdb_id)
                .ok_or_else(|| Error::new(ErrorKind::Io, "failed to read font data"))?
        };

        TtfTypeface::new(id, data, face_index)
            .map_err(|e| e.with_context(format!("failed to parse typeface {}", id.0)))
    }
}

impl Default for SystemFontSource {
    fn default() -> Self {
        SystemFontSource::new()
    }
}

impl fmt::Debug for SystemFontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFontSource")
            .field("faces", &self.db.len())
            .field("loaded", &self.loaded)
            .field("cached_failures", &self.cached_failures)
            .finish()
    }
}

fn fontdb_family(family: &FontFamily) -> fontdb::Family<'_> {
    match family.name() {
        "serif" => fontdb::Family::Serif,
        "sans-serif" => fontdb::Family::SansSerif,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        "monospace" => fontdb::Family::Monospace,
        name => fontdb::Family::Name(name),
    }
}

fn fontdb_stretch(stretch: FontWidth) -> fontdb::Stretch {
    match stretch {
        FontWidth::UltraCondensed => fontdb::Stretch::UltraCondensed,
        FontWidth::ExtraCondensed => fontdb::Stretch::ExtraCondensed,
        FontWidth::Condensed => fontdb::Stretch::Condensed,
        FontWidth::SemiCondensed => fontdb::Stretch::SemiCondensed,
        FontWidth::Normal => fontdb::Stretch::Normal,
        FontWidth::SemiExpanded => fontdb::Stretch::SemiExpanded,
        FontWidth::Expanded => fontdb::Stretch::Expanded,
        FontWidth::ExtraExpanded => fontdb::Stretch::ExtraExpanded,
        FontWidth::UltraExpanded => fontdb::Stretch::UltraExpanded,
    }
}

fn fontdb_style(style: FontStyle) -> fontdb::Style {
    match style {
        FontStyle::Normal => fontdb::Style::Normal,
        FontStyle::Italic => fontdb::Style::Italic,
        FontStyle::Oblique => fontdb::Style::Oblique,
    }
}
