//! Composite overview pixmap tiling all glyphs in a grid.

use crate::error::MosaicError;
use crate::glyph::{GlyphSet, PaletteEntry, Pixmap};
use crate::pack::RenderOptions;

/// Palette index of background pixels.
pub const COLOR_NONE: u32 = 0;
/// Palette index of ink dots.
pub const COLOR_DOT: u32 = 1;
/// Palette index reserved for grid lines.
pub const COLOR_BORDER: u32 = 2;
/// Palette index of cells past the last glyph.
pub const COLOR_UNDEF: u32 = 3;

/// Default column count of the overview.
pub const DEFAULT_COLUMNS: usize = 16;

/// Cell and pixel geometry of a mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicGrid {
    pub columns: usize,
    /// Rows completely filled with glyphs.
    pub full_rows: usize,
    /// Glyphs in the trailing partial row.
    pub remainder: usize,
    /// Total grid rows including a partial one.
    pub rows: usize,
    pub cell_width: usize,
    pub cell_height: usize,
    pixel_width: usize,
    pixel_height: usize,
}

impl MosaicGrid {
    pub fn new(
        count: usize,
        columns: usize,
        cell_width: usize,
        cell_height: usize,
    ) -> Result<MosaicGrid, MosaicError> {
        if count == 0 {
            return Err(MosaicError::EmptyGlyphSet);
        }
        if columns == 0 {
            return Err(MosaicError::ZeroColumns);
        }
        let full_rows = count / columns;
        let remainder = count % columns;
        let rows = full_rows + usize::from(remainder > 0);

        // Pixel data is a Vec<u32>, which cannot hold more than isize::MAX bytes.
        let max_pixels = isize::MAX as usize / std::mem::size_of::<u32>();
        let size = columns
            .checked_mul(cell_width)
            .zip(rows.checked_mul(cell_height))
            .filter(|&(w, h)| w.checked_mul(h).is_some_and(|n| n <= max_pixels));
        let Some((pixel_width, pixel_height)) = size else {
            return Err(MosaicError::TooLarge {
                columns,
                rows,
                cell_width,
                cell_height,
            });
        };

        Ok(MosaicGrid {
            columns,
            full_rows,
            remainder,
            rows,
            cell_width,
            cell_height,
            pixel_width,
            pixel_height,
        })
    }

    pub fn pixel_width(&self) -> usize {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> usize {
        self.pixel_height
    }

    /// Glyph index and offset within its cell for composite pixel (x, y).
    pub fn locate(&self, x: usize, y: usize) -> (usize, usize, usize) {
        let col = x / self.cell_width;
        let row = y / self.cell_height;
        (
            col + row * self.columns,
            x % self.cell_width,
            y % self.cell_height,
        )
    }
}

/// The four-entry overview palette. Ink and background swap places when
/// `inverse` is set.
pub fn palette(options: RenderOptions) -> Vec<PaletteEntry> {
    let (none, dot) = if options.inverse {
        (
            PaletteEntry::new("#", "#000000"),
            PaletteEntry::new(" ", "None"),
        )
    } else {
        (
            PaletteEntry::new(" ", "None"),
            PaletteEntry::new("#", "#000000"),
        )
    };
    vec![
        none,
        dot,
        PaletteEntry::new("|", "#FF0000"),
        PaletteEntry::new("_", "#FFFF00"),
    ]
}

/// Tile all glyphs row-major into one pixmap, `columns` cells wide.
///
/// The first glyph defines the cell size; every other glyph must match it.
/// Cells past the last glyph are filled with [`COLOR_UNDEF`].
pub fn compose(
    glyphs: &GlyphSet,
    columns: usize,
    options: RenderOptions,
) -> Result<Pixmap, MosaicError> {
    let first = glyphs.get(0).ok_or(MosaicError::EmptyGlyphSet)?;
    let (cell_width, cell_height) = (first.width(), first.height());

    if let Some((index, glyph)) = glyphs
        .iter()
        .enumerate()
        .find(|(_, g)| g.width() != cell_width || g.height() != cell_height)
    {
        return Err(MosaicError::InconsistentGlyphGeometry {
            index,
            width: glyph.width(),
            height: glyph.height(),
            cell_width,
            cell_height,
        });
    }

    let grid = MosaicGrid::new(glyphs.len(), columns, cell_width, cell_height)?;
    log::debug!(
        "mosaic: {} cols, {} full rows, {} in last row, {} x {} pixels per cell, {} x {} pixels",
        grid.columns,
        grid.full_rows,
        grid.remainder,
        grid.cell_width,
        grid.cell_height,
        grid.pixel_width(),
        grid.pixel_height()
    );

    let (width, height) = (grid.pixel_width(), grid.pixel_height());
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (index, cx, cy) = grid.locate(x, y);
            let color = match glyphs.get(index) {
                None => COLOR_UNDEF,
                Some(glyph) if glyph.is_dot(cx, cy) => COLOR_DOT,
                Some(_) => COLOR_NONE,
            };
            pixels.push(color);
        }
    }

    Ok(Pixmap {
        width,
        height,
        palette: palette(options),
        pixels,
    })
}
