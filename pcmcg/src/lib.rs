pub mod error;
pub mod profile;
pub mod glyph;
pub mod validate;
pub mod pack;
pub mod format;
pub mod mosaic;
pub mod xpm;

pub use error::Error;
pub use glyph::{Glyph, GlyphSet, InkIndex, PaletteEntry, Pixmap};
pub use pack::{RenderOptions, RowPacker};
pub use profile::GlyphProfile;
