/// End-to-end tests: XPM text → validation → hexdump, banner and overview.
use pcmcg::error::ValidationError;
use pcmcg::format;
use pcmcg::mosaic;
use pcmcg::xpm;
use pcmcg::{Glyph, GlyphProfile, GlyphSet, RenderOptions};
use pretty_assertions::assert_eq;

fn xpm_text(rows: &[&str]) -> String {
    let mut text = format!(
        "/* XPM */\nstatic char *glyph[] = {{\n\"{} {} 2 1\",\n\". c None\",\n\"# c #000000\",\n",
        rows[0].len(),
        rows.len()
    );
    for row in rows {
        text.push_str(&format!("\"{row}\",\n"));
    }
    text.push_str("};\n");
    text
}

const ZERO: [&str; 8] = [
    ".#####.",
    "#.....#",
    "#....##",
    "#...#.#",
    "#..#..#",
    "#.#...#",
    ".#####.",
    ".......",
];

const BAR: [&str; 8] = [
    "#######", ".......", ".......", ".......", ".......", ".......", ".......", ".......",
];

fn load(profile: &GlyphProfile, sources: &[(&str, &[&str])]) -> GlyphSet {
    sources
        .iter()
        .map(|(name, rows)| {
            let pixmap = xpm::parse(&xpm_text(rows)).unwrap();
            Glyph::new(*name, pixmap, profile).unwrap()
        })
        .collect()
}

#[test]
fn hexdump_of_two_glyphs() {
    let profile = GlyphProfile::pcm6416();
    let glyphs = load(&profile, &[("zero.xpm", &ZERO), ("bar.xpm", &BAR)]);

    let mut out = Vec::new();
    format::write_hexdump(&mut out, &profile, RenderOptions::default(), &glyphs).unwrap();
    let expected = "\
0000000: 7C 82 86 8A 92 A2 7C 00 \n\
0000008: FE 00 00 00 00 00 00 00 \n";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn negated_hexdump() {
    let profile = GlyphProfile::pcm6416();
    let glyphs = load(&profile, &[("bar.xpm", &BAR)]);

    let mut out = Vec::new();
    format::write_hexdump(&mut out, &profile, RenderOptions::negated(), &glyphs).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "0000000: 00 FE FE FE FE FE FE FE \n"
    );
}

#[test]
fn banner_of_zero() {
    let profile = GlyphProfile::pcm6416();
    let glyphs = load(&profile, &[("zero.xpm", &ZERO)]);

    let mut out = Vec::new();
    format::write_banners(&mut out, &profile, RenderOptions::default(), &glyphs).unwrap();
    let expected = "\
____________________
| ##### |  0x7C
|#     #|  0x82
|#    ##|  0x86
|#   # #|  0x8A
|#  #  #|  0x92
|# #   #|  0xA2
| ##### |  0x7C
|       |  0x00
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn vid2k_rejects_pcm6416_glyph() {
    let pixmap = xpm::parse(&xpm_text(&ZERO)).unwrap();
    let err = Glyph::new("zero.xpm", pixmap, &GlyphProfile::vid2k()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DimensionMismatch {
            width: 7,
            height: 8,
            expected_width: 8,
            expected_height: 10,
        }
    );
    assert_eq!(
        err.to_string(),
        "dimension validation: 7 x 8 (8 x 10 expected)"
    );
}

#[test]
fn overview_round_trips_through_xpm() {
    let profile = GlyphProfile::pcm6416();
    let glyphs = load(
        &profile,
        &[
            ("0.xpm", &ZERO),
            ("1.xpm", &BAR),
            ("2.xpm", &ZERO),
            ("3.xpm", &BAR),
            ("4.xpm", &ZERO),
        ],
    );

    let pm = mosaic::compose(&glyphs, 2, RenderOptions::default()).unwrap();
    assert_eq!((pm.width, pm.height), (14, 24));

    let mut out = Vec::new();
    xpm::write(&mut out, "overview", &pm).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("/* XPM */\nstatic char *overview[] = {\n"));

    let back = xpm::parse(&text).unwrap();
    assert_eq!(back, pm);
    // bottom right cell is past the last glyph
    assert_eq!(back.pixel(13, 23), mosaic::COLOR_UNDEF);
    assert_eq!(back.row(16), &[0, 1, 1, 1, 1, 1, 0, 3, 3, 3, 3, 3, 3, 3]);
}
