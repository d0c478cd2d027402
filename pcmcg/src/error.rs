use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("dimension validation: {width} x {height} ({expected_width} x {expected_height} expected)")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },

    #[error("too many colors: {colors} colors ({max_colors} colors expected)")]
    TooManyColors { colors: usize, max_colors: usize },

    #[error("missing dot color: {0} expected")]
    MissingInkColor(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MosaicError {
    #[error("no glyphs to compose")]
    EmptyGlyphSet,

    #[error("column count must be at least 1")]
    ZeroColumns,

    #[error("glyph {index} is {width} x {height}, expected {cell_width} x {cell_height} like the first glyph")]
    InconsistentGlyphGeometry {
        index: usize,
        width: usize,
        height: usize,
        cell_width: usize,
        cell_height: usize,
    },

    #[error("{columns} columns x {rows} rows of {cell_width} x {cell_height} pixel cells exceed the addressable pixmap size")]
    TooLarge {
        columns: usize,
        rows: usize,
        cell_width: usize,
        cell_height: usize,
    },
}

#[derive(Debug, Error)]
pub enum XpmError {
    #[error("can not open file {path}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no pixmap file: {0}")]
    Invalid(String),

    #[error("color error: {0}")]
    Color(String),

    #[error("write failed")]
    Write(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("config error: {0}")]
    Config(String),

    #[error("profile '{name}': {message}")]
    Invariant { name: String, message: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Mosaic(#[from] MosaicError),

    #[error("XPM")]
    Decode(#[from] XpmError),
}
