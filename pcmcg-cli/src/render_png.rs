//! PNG rendering of overview pixmaps.

use anyhow::{Context, Result};
use pcmcg::Pixmap;
use std::path::Path;

/// Write an overview pixmap as an RGBA PNG, each pixel scaled to a
/// `scale` x `scale` block.
pub fn write_overview_png(pixmap: &Pixmap, scale: usize, path: &Path) -> Result<()> {
    anyhow::ensure!(scale > 0, "scale must be at least 1");

    let colors = pixmap
        .palette
        .iter()
        .map(|entry| {
            parse_color(&entry.color)
                .with_context(|| format!("palette entry '{}'", entry.key))
        })
        .collect::<Result<Vec<_>>>()?;

    let width = pixmap.width * scale;
    let height = pixmap.height * scale;
    let mut rgba = vec![0u8; width * height * 4];

    for y in 0..pixmap.height {
        for x in 0..pixmap.width {
            let color = colors[pixmap.pixel(x, y) as usize];
            for sy in 0..scale {
                let row = (y * scale + sy) * width;
                for sx in 0..scale {
                    let offset = (row + x * scale + sx) * 4;
                    rgba[offset..offset + 4].copy_from_slice(&color);
                }
            }
        }
    }

    write_rgba_png(path, &rgba, width, height)
}

/// Parse an XPM color identifier: `None` or `#RRGGBB`.
fn parse_color(color: &str) -> Result<[u8; 4]> {
    if color.eq_ignore_ascii_case("none") {
        return Ok([0, 0, 0, 0]);
    }
    let hex = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .with_context(|| format!("unsupported color '{}', use #RRGGBB or None", color))?;
    let value = u32::from_str_radix(hex, 16)
        .with_context(|| format!("invalid hex color '{}'", color))?;
    let [_, r, g, b] = value.to_be_bytes();
    Ok([r, g, b, 255])
}

fn write_rgba_png(path: &Path, pixels: &[u8], width: usize, height: usize) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let w = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header for {}", path.display()))?;
    writer
        .write_image_data(pixels)
        .with_context(|| format!("writing PNG data for {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_none_is_transparent() {
        assert_eq!(parse_color("None").unwrap(), [0, 0, 0, 0]);
        assert_eq!(parse_color("none").unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(parse_color("#000000").unwrap(), [0, 0, 0, 255]);
        assert_eq!(parse_color("#FF0000").unwrap(), [255, 0, 0, 255]);
        assert_eq!(parse_color("#ffff00").unwrap(), [255, 255, 0, 255]);
    }

    #[test]
    fn parse_rejects_named_and_short_colors() {
        assert!(parse_color("black").is_err());
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("#GG0000").is_err());
    }
}
