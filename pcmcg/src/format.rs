//! Text renderings of packed glyphs: xxd-conform hex records and banners.

use std::io::{self, Write};

use smallvec::SmallVec;

use crate::glyph::{Glyph, GlyphSet};
use crate::pack::{RenderOptions, RowPacker};
use crate::profile::GlyphProfile;

/// Top border of every banner.
pub const BANNER_BORDER: &str = "____________________";

/// The packed bytes of one glyph, padded to `bound_bytes`.
pub type Record = SmallVec<[u8; 16]>;

/// Pack `glyph` into a fixed-length PROM record.
///
/// Rows beyond the glyph height are filled with the packer's pad byte. A
/// glyph taller than `bound_bytes` keeps all of its rows.
pub fn record(packer: &RowPacker, glyph: &Glyph, bound_bytes: usize) -> Record {
    let mut bytes: Record = packer.pack_glyph(glyph).collect();
    let pad = bound_bytes.saturating_sub(bytes.len());
    bytes.extend(std::iter::repeat(packer.pad_byte()).take(pad));
    bytes
}

/// Write one hex record line: `AAAAAAA: BB BB ... \n`.
pub fn write_hex_record<W: Write>(w: &mut W, address: usize, bytes: &[u8]) -> io::Result<()> {
    write!(w, "{:07X}: ", address)?;
    for byte in bytes {
        write!(w, "{:02X} ", byte)?;
    }
    writeln!(w)
}

/// Write one record per glyph, glyph `n` at address `n * bound_bytes`.
pub fn write_hexdump<W: Write>(
    w: &mut W,
    profile: &GlyphProfile,
    options: RenderOptions,
    glyphs: &GlyphSet,
) -> io::Result<()> {
    let packer = RowPacker::new(profile, options);
    for (index, glyph) in glyphs.iter().enumerate() {
        log::info!("process: {} ... ", glyph.source);
        let bytes = record(&packer, glyph, profile.bound_bytes);
        write_hex_record(w, index * profile.bound_bytes, &bytes)?;
    }
    Ok(())
}

/// Write the banner of one glyph: a border line, then one line per row
/// with the pixels drawn between pipes and the packed byte.
pub fn write_banner<W: Write>(
    w: &mut W,
    packer: &RowPacker,
    options: RenderOptions,
    glyph: &Glyph,
) -> io::Result<()> {
    writeln!(w, "{}", BANNER_BORDER)?;
    for row in glyph.pixmap.rows() {
        let line: String = row
            .iter()
            .map(|&pixel| {
                if glyph.ink.is_ink(pixel) != options.inverse {
                    '#'
                } else {
                    ' '
                }
            })
            .collect();
        writeln!(w, "|{}|  0x{:02X}", line, packer.pack_row(row, glyph.ink))?;
    }
    Ok(())
}

/// Write the banners of all glyphs in order.
pub fn write_banners<W: Write>(
    w: &mut W,
    profile: &GlyphProfile,
    options: RenderOptions,
    glyphs: &GlyphSet,
) -> io::Result<()> {
    let packer = RowPacker::new(profile, options);
    for glyph in glyphs {
        log::info!("process: {} ... ", glyph.source);
        write_banner(w, &packer, options, glyph)?;
    }
    Ok(())
}
