use crate::error::ValidationError;
use crate::glyph::{InkIndex, Pixmap};
use crate::profile::GlyphProfile;

/// Check a decoded pixmap against the profile and locate its ink color.
///
/// The first palette entry whose color equals `profile.ink_color` wins.
/// A palette without the ink color is accepted only when it has exactly
/// `max_colors - 1` entries; the glyph then carries a sentinel ink index
/// and packs as blank.
pub fn validate(pixmap: &Pixmap, profile: &GlyphProfile) -> Result<InkIndex, ValidationError> {
    if pixmap.width != profile.width || pixmap.height != profile.height {
        return Err(ValidationError::DimensionMismatch {
            width: pixmap.width,
            height: pixmap.height,
            expected_width: profile.width,
            expected_height: profile.height,
        });
    }

    let colors = pixmap.palette.len();
    if colors > profile.max_colors {
        return Err(ValidationError::TooManyColors {
            colors,
            max_colors: profile.max_colors,
        });
    }

    let found = pixmap
        .palette
        .iter()
        .position(|entry| entry.color == profile.ink_color);

    match found {
        Some(index) => {
            log::debug!("ink color {} at palette index {}", profile.ink_color, index);
            Ok(InkIndex::found(index as u32))
        }
        // Legacy rule: only a palette one short of the maximum may lack ink.
        None if colors + 1 == profile.max_colors => {
            log::debug!(
                "ink color {} absent from {} color palette, glyph is blank",
                profile.ink_color,
                colors
            );
            Ok(InkIndex::missing(colors))
        }
        None => Err(ValidationError::MissingInkColor(profile.ink_color.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::test_util::pixmap_from_art;
    use crate::glyph::PaletteEntry;

    fn blank_rows() -> Vec<&'static str> {
        vec!["       "; 8]
    }

    #[test]
    fn exact_match_returns_palette_position() {
        let pm = pixmap_from_art(&blank_rows());
        assert_eq!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Ok(InkIndex::found(1))
        );
    }

    #[test]
    fn ink_position_follows_palette_order() {
        let mut pm = pixmap_from_art(&blank_rows());
        pm.palette.swap(0, 1);
        assert_eq!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Ok(InkIndex::found(0))
        );
    }

    #[test]
    fn wrong_width_is_dimension_mismatch() {
        let pm = pixmap_from_art(&["      "; 8]);
        assert_eq!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Err(ValidationError::DimensionMismatch {
                width: 6,
                height: 8,
                expected_width: 7,
                expected_height: 8,
            })
        );
    }

    #[test]
    fn wrong_height_is_dimension_mismatch() {
        let pm = pixmap_from_art(&["       "; 10]);
        assert!(matches!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Err(ValidationError::DimensionMismatch { height: 10, .. })
        ));
    }

    #[test]
    fn dimension_is_checked_before_colors() {
        let mut pm = pixmap_from_art(&["  "; 2]);
        pm.palette.push(PaletteEntry::new("r", "#FF0000"));
        pm.palette.push(PaletteEntry::new("g", "#00FF00"));
        assert!(matches!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Err(ValidationError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn too_many_colors() {
        let mut pm = pixmap_from_art(&blank_rows());
        pm.palette.push(PaletteEntry::new("r", "#FF0000"));
        assert_eq!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Err(ValidationError::TooManyColors {
                colors: 3,
                max_colors: 2,
            })
        );
    }

    #[test]
    fn single_color_palette_without_ink_is_tolerated() {
        let mut pm = pixmap_from_art(&blank_rows());
        pm.palette.truncate(1);
        assert_eq!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Ok(InkIndex::missing(1))
        );
    }

    #[test]
    fn full_palette_without_ink_is_rejected() {
        let mut pm = pixmap_from_art(&blank_rows());
        pm.palette[1].color = "#FFFFFF".to_string();
        assert_eq!(
            validate(&pm, &GlyphProfile::pcm6416()),
            Err(ValidationError::MissingInkColor("#000000".to_string()))
        );
    }

    #[test]
    fn short_palette_without_ink_is_rejected_unless_one_below_max() {
        let mut profile = GlyphProfile::pcm6416();
        profile.max_colors = 4;
        let mut pm = pixmap_from_art(&blank_rows());
        pm.palette.truncate(1);
        // 1 color, max 4: not exactly max - 1
        assert!(matches!(
            validate(&pm, &profile),
            Err(ValidationError::MissingInkColor(_))
        ));

        pm.palette.push(PaletteEntry::new("r", "#FF0000"));
        pm.palette.push(PaletteEntry::new("g", "#00FF00"));
        assert_eq!(validate(&pm, &profile), Ok(InkIndex::missing(3)));
    }

    #[test]
    fn first_ink_entry_wins() {
        let mut profile = GlyphProfile::pcm6416();
        profile.max_colors = 3;
        let mut pm = pixmap_from_art(&blank_rows());
        pm.palette.push(PaletteEntry::new("x", "#000000"));
        assert_eq!(validate(&pm, &profile), Ok(InkIndex::found(1)));
    }
}
