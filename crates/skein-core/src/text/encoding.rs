use std::char::REPLACEMENT_CHARACTER;

use crate::text::GlyphId;

/// How a byte span handed to the builder is interpreted.
///
/// Multi-byte code units (UTF-16, UTF-32 and glyph ids) are in native byte
/// order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16,
    Utf32,
    /// Every two bytes are one [`GlyphId`]; no typeface lookup is needed.
    GlyphId,
}

impl TextEncoding {
    /// Counts code points in `bytes`.
    ///
    /// Returns `None` if `bytes` is not valid in this encoding. For
    /// [`TextEncoding::GlyphId`] this is the number of whole glyph ids.
    pub fn count_chars(self, bytes: &[u8]) -> Option<usize> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(|s| s.chars().count()),
            TextEncoding::Utf16 => {
                if bytes.len() % 2 != 0 {
                    return None;
                }

                let mut count = 0;
                for unit in char::decode_utf16(utf16_units(bytes)) {
                    unit.ok()?;
                    count += 1;
                }
                Some(count)
            }
            TextEncoding::Utf32 => {
                if bytes.len() % 4 != 0 {
                    return None;
                }

                utf32_units(bytes).try_fold(0, |count, unit| {
                    char::from_u32(unit).map(|_| count + 1)
                })
            }
            TextEncoding::GlyphId => Some(bytes.len() / 2),
        }
    }

    /// Decodes `bytes` into characters, substituting
    /// [`REPLACEMENT_CHARACTER`] for malformed sequences.
    ///
    /// Glyph id input yields nothing; use [`glyph_ids_from_bytes`] instead.
    pub fn chars(self, bytes: &[u8]) -> Chars<'_> {
        let inner = match self {
            TextEncoding::Utf8 => CharsInner::Utf8 {
                chunks: bytes.utf8_chunks(),
                valid: "".chars(),
                replace: false,
            },
            TextEncoding::Utf16 => {
                CharsInner::Utf16(char::decode_utf16(utf16_units(bytes)))
            }
            TextEncoding::Utf32 => CharsInner::Utf32(utf32_units(bytes)),
            TextEncoding::GlyphId => CharsInner::Empty,
        };

        Chars { inner }
    }
}

/// Reinterprets `bytes` as native-endian glyph ids. A trailing odd byte is
/// ignored.
pub fn glyph_ids_from_bytes(bytes: &[u8]) -> impl Iterator<Item = GlyphId> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| GlyphId::from_ne_bytes([pair[0], pair[1]]))
}

type Utf16Units<'a> = std::iter::Map<std::slice::ChunksExact<'a, u8>, fn(&[u8]) -> u16>;
type Utf32Units<'a> = std::iter::Map<std::slice::ChunksExact<'a, u8>, fn(&[u8]) -> u32>;

fn utf16_units(bytes: &[u8]) -> Utf16Units<'_> {
    bytes.chunks_exact(2).map(utf16_unit as fn(&[u8]) -> u16)
}

fn utf32_units(bytes: &[u8]) -> Utf32Units<'_> {
    bytes.chunks_exact(4).map(utf32_unit as fn(&[u8]) -> u32)
}

fn utf16_unit(unit: &[u8]) -> u16 {
    u16::from_ne_bytes([unit[0], unit[1]])
}

fn utf32_unit(unit: &[u8]) -> u32 {
    u32::from_ne_bytes([unit[0], unit[1], unit[2], unit[3]])
}

/// Iterator returned by [`TextEncoding::chars`].
pub struct Chars<'a> {
    inner: CharsInner<'a>,
}

enum CharsInner<'a> {
    Utf8 {
        chunks: std::str::Utf8Chunks<'a>,
        valid: std::str::Chars<'a>,
        /// The chunk being decoded ended in an invalid sequence.
        replace: bool,
    },
    Utf16(std::char::DecodeUtf16<Utf16Units<'a>>),
    Utf32(Utf32Units<'a>),
    Empty,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match &mut self.inner {
            CharsInner::Utf8 {
                chunks,
                valid,
                replace,
            } => loop {
                if let Some(c) = valid.next() {
                    return Some(c);
                }
                if std::mem::take(replace) {
                    return Some(REPLACEMENT_CHARACTER);
                }

                let chunk = chunks.next()?;
                *valid = chunk.valid().chars();
                *replace = !chunk.invalid().is_empty();
            },
            CharsInner::Utf16(units) => units
                .next()
                .map(|unit| unit.unwrap_or(REPLACEMENT_CHARACTER)),
            CharsInner::Utf32(units) => units
                .next()
                .map(|unit| char::from_u32(unit).unwrap_or(REPLACEMENT_CHARACTER)),
            CharsInner::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_bytes(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_ne_bytes).collect()
    }

    fn utf32_bytes(s: &str) -> Vec<u8> {
        s.chars().flat_map(|c| (c as u32).to_ne_bytes()).collect()
    }

    #[test]
    fn counts_code_points_in_every_encoding() {
        let text = "añ😀";

        assert_eq!(TextEncoding::Utf8.count_chars(text.as_bytes()), Some(3));
        assert_eq!(TextEncoding::Utf16.count_chars(&utf16_bytes(text)), Some(3));
        assert_eq!(TextEncoding::Utf32.count_chars(&utf32_bytes(text)), Some(3));
        assert_eq!(TextEncoding::GlyphId.count_chars(&[1, 0, 2, 0, 9]), Some(2));
    }

    #[test]
    fn malformed_input_has_no_count() {
        assert_eq!(TextEncoding::Utf8.count_chars(&[0x61, 0xff]), None);
        assert_eq!(TextEncoding::Utf16.count_chars(&[0x61]), None);
        // lone high surrogate
        assert_eq!(
            TextEncoding::Utf16.count_chars(&0xd800u16.to_ne_bytes()),
            None
        );
        assert_eq!(
            TextEncoding::Utf32.count_chars(&0x11_0000u32.to_ne_bytes()),
            None
        );
    }

    #[test]
    fn empty_input_counts_zero() {
        assert_eq!(TextEncoding::Utf8.count_chars(b""), Some(0));
        assert_eq!(TextEncoding::Utf16.count_chars(b""), Some(0));
    }

    #[test]
    fn decodes_characters() {
        let text = "héllo 😀";

        let collect = |encoding: TextEncoding, bytes: &[u8]| {
            encoding.chars(bytes).collect::<String>()
        };

        assert_eq!(collect(TextEncoding::Utf8, text.as_bytes()), text);
        assert_eq!(collect(TextEncoding::Utf16, &utf16_bytes(text)), text);
        assert_eq!(collect(TextEncoding::Utf32, &utf32_bytes(text)), text);
        assert_eq!(collect(TextEncoding::GlyphId, &[1, 2]), "");
    }

    #[test]
    fn replaces_malformed_utf8() {
        let chars = TextEncoding::Utf8
            .chars(&[b'a', 0xff, b'b'])
            .collect::<String>();
        assert_eq!(chars, "a\u{fffd}b");
    }

    #[test]
    fn one_replacement_per_invalid_sequence() {
        let decode = |bytes: &[u8]| TextEncoding::Utf8.chars(bytes).collect::<String>();

        // truncated three byte sequence
        assert_eq!(decode(&[b'a', 0xe2, 0x82]), "a\u{fffd}");
        assert_eq!(decode(&[0xff, 0xfe]), "\u{fffd}\u{fffd}");
        assert_eq!(decode(&[0xe2, 0x82, 0xac, 0x80, b'x']), "\u{20ac}\u{fffd}x");
        assert_eq!(decode(b""), "");
    }

    #[test]
    fn glyph_ids_are_native_endian_pairs() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u16.to_ne_bytes());
        bytes.extend_from_slice(&300u16.to_ne_bytes());
        bytes.push(0xaa);

        assert_eq!(glyph_ids_from_bytes(&bytes).collect::<Vec<_>>(), [7, 300]);
    }
}
