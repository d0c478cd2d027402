use crate::glyph::{Glyph, InkIndex};
use crate::profile::GlyphProfile;

/// Per-run output switches on top of the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Complement the packed rows in addition to what the profile asks for.
    pub negate: bool,
    /// Swap ink and background in banner and mosaic output.
    pub inverse: bool,
}

impl RenderOptions {
    /// Negated PROM content with inverse display, as `--neg` requests.
    pub fn negated() -> Self {
        RenderOptions {
            negate: true,
            inverse: true,
        }
    }
}

/// Turns pixel rows into PROM bytes.
///
/// Bit order follows pixel order: the leftmost pixel ends up in the most
/// significant of the `bound_bits` packed bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPacker {
    bound_bits: u32,
    left_bound: bool,
    negated: bool,
}

impl RowPacker {
    /// Build a packer for `profile`. The profile must satisfy
    /// [`GlyphProfile::check`].
    pub fn new(profile: &GlyphProfile, options: RenderOptions) -> Self {
        RowPacker {
            bound_bits: profile.bound_bits.min(8),
            left_bound: profile.left_bound,
            negated: profile.negated || options.negate,
        }
    }

    /// Pack one row of palette indices.
    pub fn pack_row(&self, row: &[u32], ink: InkIndex) -> u8 {
        let mut bits: u64 = 0;
        for &pixel in row {
            bits += u64::from(ink.is_ink(pixel));
            bits <<= 1;
        }
        bits >>= 1;
        self.finish(bits)
    }

    /// Byte for a row with no ink, used to pad short glyphs.
    pub fn pad_byte(&self) -> u8 {
        self.finish(0)
    }

    /// Packed bytes of every row of `glyph`, top to bottom.
    pub fn pack_glyph<'a>(&'a self, glyph: &'a Glyph) -> impl Iterator<Item = u8> + 'a {
        glyph
            .pixmap
            .rows()
            .map(move |row| self.pack_row(row, glyph.ink))
    }

    fn finish(&self, bits: u64) -> u8 {
        let bits = if self.negated { !bits } else { bits };
        let masked = bits & ((1u64 << self.bound_bits) - 1);
        let aligned = if self.left_bound {
            masked << (8 - self.bound_bits)
        } else {
            masked
        };
        aligned as u8
    }
}
