#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::error::ProfileError;

/// Geometry, color and bit layout expected by one character generator PROM.
///
/// A profile is built once per run and never mutated afterwards; every
/// component receives it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct GlyphProfile {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Expected glyph width in pixels.
    pub width: usize,
    /// Expected glyph height in pixels.
    pub height: usize,
    /// Maximum number of palette entries a glyph may use.
    #[cfg_attr(feature = "serde", serde(default = "default_max_colors"))]
    pub max_colors: usize,
    /// Color identifier of an illuminated pixel.
    #[cfg_attr(feature = "serde", serde(default = "default_ink_color"))]
    pub ink_color: String,
    /// Number of meaningful bits packed per row.
    pub bound_bits: u32,
    /// Fixed record length per glyph in bytes.
    pub bound_bytes: usize,
    /// Place the packed bits in the most significant end of the byte.
    #[cfg_attr(feature = "serde", serde(default))]
    pub left_bound: bool,
    /// Store rows complemented.
    #[cfg_attr(feature = "serde", serde(default))]
    pub negated: bool,
}

#[cfg(feature = "serde")]
fn default_max_colors() -> usize {
    2
}

#[cfg(feature = "serde")]
fn default_ink_color() -> String {
    INK_BLACK.to_string()
}

const INK_BLACK: &str = "#000000";

impl GlyphProfile {
    /// The original PC/M 64x16 character generator PROM.
    pub fn pcm6416() -> GlyphProfile {
        GlyphProfile {
            name: "pcm6416".to_string(),
            description: "original PC/M 64x16 character generator PROM".to_string(),
            width: 7,
            height: 8,
            max_colors: 2,
            ink_color: INK_BLACK.to_string(),
            bound_bits: 7,
            bound_bytes: 8,
            left_bound: true,
            negated: false,
        }
    }

    /// The PC/M VID2k character generator PROM.
    pub fn vid2k() -> GlyphProfile {
        GlyphProfile {
            name: "vid2k".to_string(),
            description: "PC/M VID2k character generator PROM".to_string(),
            width: 8,
            height: 10,
            max_colors: 2,
            ink_color: INK_BLACK.to_string(),
            bound_bits: 8,
            bound_bytes: 16,
            left_bound: false,
            negated: true,
        }
    }

    /// Parse a TOML profile and check its invariants.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<GlyphProfile, ProfileError> {
        let profile: GlyphProfile =
            toml::from_str(toml_str).map_err(|e| ProfileError::Config(e.to_string()))?;
        profile.check()?;
        Ok(profile)
    }

    /// Check the bit layout against the glyph geometry.
    pub fn check(&self) -> Result<(), ProfileError> {
        let fail = |message: String| {
            Err(ProfileError::Invariant {
                name: self.name.clone(),
                message,
            })
        };
        if self.bound_bits == 0 || self.bound_bits > 8 {
            return fail(format!("bound_bits {} outside 1..=8", self.bound_bits));
        }
        if self.bound_bits as usize > self.width {
            return fail(format!(
                "bound_bits {} exceeds glyph width {}",
                self.bound_bits, self.width
            ));
        }
        if self.height == 0 || self.height > self.bound_bytes {
            return fail(format!(
                "glyph height {} outside 1..={} (bound_bytes)",
                self.height, self.bound_bytes
            ));
        }
        if self.max_colors == 0 {
            return fail("max_colors must be at least 1".to_string());
        }
        Ok(())
    }
}

/// List of all built-in profile names.
pub const BUILTIN_NAMES: &[&str] = &["pcm6416", "vid2k"];

/// Load a built-in profile by name.
pub fn builtin_profile(name: &str) -> Option<GlyphProfile> {
    match name {
        "pcm6416" => Some(GlyphProfile::pcm6416()),
        "vid2k" => Some(GlyphProfile::vid2k()),
        _ => None,
    }
}
