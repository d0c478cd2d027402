use std::path::Path;

use crate::error::{Error, ValidationError};
use crate::profile::GlyphProfile;
use crate::{validate, xpm};

/// One palette slot of a decoded pixmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Characters standing for this color in the pixel data.
    pub key: String,
    /// Color identifier, e.g. `#000000` or `None`.
    pub color: String,
}

impl PaletteEntry {
    pub fn new(key: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            color: color.into(),
        }
    }
}

/// A palette-indexed image with row-major pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub width: usize,
    pub height: usize,
    pub palette: Vec<PaletteEntry>,
    /// Palette indices, `width * height` entries.
    pub pixels: Vec<u32>,
}

impl Pixmap {
    /// Get the palette index at (x, y).
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Pixels of row `y`, left to right.
    pub fn row(&self, y: usize) -> &[u32] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.height).map(move |y| self.row(y))
    }
}

/// Palette index of the ink color within one glyph.
///
/// When the palette lacks the ink color the index points one past the end
/// of the palette, so it never equals any pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkIndex(u32);

impl InkIndex {
    pub const fn found(index: u32) -> Self {
        InkIndex(index)
    }

    /// Sentinel for a palette of `palette_len` entries without ink.
    pub fn missing(palette_len: usize) -> Self {
        InkIndex(palette_len as u32 + 1)
    }

    /// Whether the pixel value is an ink dot.
    #[inline]
    pub fn is_ink(self, pixel: u32) -> bool {
        pixel == self.0
    }
}

/// A decoded and validated character pixmap.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// File name or label the pixmap came from.
    pub source: String,
    pub pixmap: Pixmap,
    pub ink: InkIndex,
}

impl Glyph {
    /// Validate `pixmap` against `profile` and resolve its ink index.
    pub fn new(
        source: impl Into<String>,
        pixmap: Pixmap,
        profile: &GlyphProfile,
    ) -> Result<Glyph, ValidationError> {
        let ink = validate::validate(&pixmap, profile)?;
        Ok(Glyph {
            source: source.into(),
            pixmap,
            ink,
        })
    }

    /// Read an XPM file and validate it as a glyph.
    pub fn load(path: &Path, profile: &GlyphProfile) -> Result<Glyph, Error> {
        let pixmap = xpm::read_file(path)?;
        Ok(Glyph::new(path.display().to_string(), pixmap, profile)?)
    }

    pub fn width(&self) -> usize {
        self.pixmap.width
    }

    pub fn height(&self) -> usize {
        self.pixmap.height
    }

    /// Whether the pixel at (x, y) is an ink dot.
    pub fn is_dot(&self, x: usize, y: usize) -> bool {
        self.ink.is_ink(self.pixmap.pixel(x, y))
    }
}

/// Ordered glyphs of one run.
#[derive(Debug, Clone, Default)]
pub struct GlyphSet {
    glyphs: Vec<Glyph>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.glyphs.iter()
    }
}

impl FromIterator<Glyph> for GlyphSet {
    fn from_iter<I: IntoIterator<Item = Glyph>>(iter: I) -> Self {
        GlyphSet {
            glyphs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GlyphSet {
    type Item = &'a Glyph;
    type IntoIter = std::slice::Iter<'a, Glyph>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.iter()
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Build a two-color pixmap from ASCII art: `#` is `#000000`, anything
    /// else is `None`.
    pub fn pixmap_from_art(rows: &[&str]) -> Pixmap {
        let width = rows.first().map_or(0, |r| r.len());
        let pixels = rows
            .iter()
            .flat_map(|r| r.bytes().map(|b| u32::from(b == b'#')))
            .collect();
        Pixmap {
            width,
            height: rows.len(),
            palette: vec![
                PaletteEntry::new(" ", "None"),
                PaletteEntry::new("#", "#000000"),
            ],
            pixels,
        }
    }

    /// A validated glyph with ink at palette index 1.
    pub fn glyph_from_art(rows: &[&str]) -> Glyph {
        Glyph {
            source: "test.xpm".to_string(),
            pixmap: pixmap_from_art(rows),
            ink: InkIndex::found(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn pixmap_rows_are_row_major() {
        let pm = pixmap_from_art(&["#  ", " # ", "  #"]);
        let rows: Vec<&[u32]> = pm.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], &[0, 1, 0]);
        assert_eq!(pm.row(2), &[0, 0, 1]);
        assert_eq!(pm.pixel(0, 0), 1);
    }

    #[test]
    fn missing_ink_never_matches_a_pixel() {
        let ink = InkIndex::missing(2);
        assert_eq!(ink, InkIndex::found(3));
        assert!(!ink.is_ink(0));
        assert!(!ink.is_ink(1));
    }

    #[test]
    fn glyph_new_resolves_ink() {
        let profile = GlyphProfile::pcm6416();
        let art = ["#######"; 8];
        let glyph = Glyph::new("a.xpm", pixmap_from_art(&art), &profile).unwrap();
        assert_eq!(glyph.ink, InkIndex::found(1));
        assert!(glyph.is_dot(6, 7));
    }

    #[test]
    fn glyph_load_reports_decode_failure() {
        let err = Glyph::load(Path::new("/nonexistent/a.xpm"), &GlyphProfile::pcm6416());
        assert!(matches!(err, Err(Error::Decode(_))));
    }

    #[test]
    fn glyph_set_keeps_order() {
        let set: GlyphSet = ["a", "b", "c"]
            .iter()
            .map(|name| Glyph {
                source: name.to_string(),
                ..glyph_from_art(&["#"])
            })
            .collect();
        let names: Vec<&str> = set.iter().map(|g| g.source.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }
}
