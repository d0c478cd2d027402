//! Minimal XPM3 reader and writer.
//!
//! Only what character pixmaps need: a C array of strings holding the
//! `width height ncolors cpp` header, the color table and the pixel rows.
//! Hotspot values and extensions are accepted and ignored.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::error::XpmError;
use crate::glyph::{PaletteEntry, Pixmap};

/// Visual keys allowed in a color line.
const VISUAL_KEYS: &[&str] = &["c", "m", "g4", "g", "s"];

/// Read and decode an XPM file.
pub fn read_file(path: &Path) -> Result<Pixmap, XpmError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::InvalidData {
            XpmError::Invalid(format!("{} is not a text file", path.display()))
        } else {
            XpmError::Open {
                path: path.display().to_string(),
                source,
            }
        }
    })?;
    parse(&text)
}

/// Decode XPM3 text into a pixmap.
pub fn parse(text: &str) -> Result<Pixmap, XpmError> {
    let strings = string_literals(text)?;
    let mut strings = strings.iter();

    let header = strings
        .next()
        .ok_or_else(|| XpmError::Invalid("no values string".to_string()))?;
    let values = header
        .split_whitespace()
        .take(4)
        .map(|v| v.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| XpmError::Invalid(format!("bad values string \"{header}\"")))?;
    let [width, height, ncolors, cpp] = values[..] else {
        return Err(XpmError::Invalid(format!(
            "values string \"{header}\" needs width, height, ncolors and cpp"
        )));
    };
    if cpp == 0 {
        return Err(XpmError::Invalid("zero characters per pixel".to_string()));
    }

    let mut palette = Vec::with_capacity(ncolors);
    let mut lookup: HashMap<String, u32> = HashMap::with_capacity(ncolors);
    for index in 0..ncolors {
        let line = strings
            .next()
            .ok_or_else(|| XpmError::Invalid(format!("missing color {index}")))?;
        let entry = parse_color(line, cpp)?;
        if lookup.insert(entry.key.clone(), index as u32).is_some() {
            return Err(XpmError::Color(format!("duplicate key \"{}\"", entry.key)));
        }
        palette.push(entry);
    }

    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let line = strings
            .next()
            .ok_or_else(|| XpmError::Invalid(format!("missing pixel row {y}")))?;
        let chars: Vec<char> = line.chars().collect();
        if chars.len() < width * cpp {
            return Err(XpmError::Invalid(format!(
                "pixel row {y} has {} characters, {} expected",
                chars.len(),
                width * cpp
            )));
        }
        for key in chars.chunks_exact(cpp).take(width) {
            let key: String = key.iter().collect();
            let index = lookup.get(&key).ok_or_else(|| {
                XpmError::Invalid(format!("undefined pixel \"{key}\" in row {y}"))
            })?;
            pixels.push(*index);
        }
    }

    Ok(Pixmap {
        width,
        height,
        palette,
        pixels,
    })
}

/// Parse one color table line: `cpp` key characters, then visual key and
/// value pairs. The `c` value is the color identifier; without one the
/// first other visual is used.
fn parse_color(line: &str, cpp: usize) -> Result<PaletteEntry, XpmError> {
    let split = line
        .char_indices()
        .nth(cpp)
        .map_or(line.len(), |(i, _)| i);
    if line[..split].chars().count() < cpp {
        return Err(XpmError::Color(format!("color line \"{line}\" too short")));
    }
    let (key, rest) = line.split_at(split);

    let mut visuals: Vec<(&str, Vec<&str>)> = Vec::new();
    for token in rest.split_whitespace() {
        let is_visual = VISUAL_KEYS.contains(&token);
        if let Some((_, value)) = visuals.last_mut() {
            if !is_visual || value.is_empty() {
                value.push(token);
                continue;
            }
        }
        if !is_visual {
            return Err(XpmError::Color(format!(
                "unknown visual \"{token}\" for key \"{key}\""
            )));
        }
        visuals.push((token, Vec::new()));
    }
    if visuals.is_empty() || visuals.iter().any(|(_, value)| value.is_empty()) {
        return Err(XpmError::Color(format!("incomplete color for key \"{key}\"")));
    }

    let (_, value) = visuals
        .iter()
        .find(|(visual, _)| *visual == "c")
        .unwrap_or(&visuals[0]);
    Ok(PaletteEntry::new(key, value.join(" ")))
}

/// Collect the C string literals of an XPM file, skipping comments.
fn string_literals(text: &str) -> Result<Vec<String>, XpmError> {
    let body = text.trim_start();
    let Some(after) = body.strip_prefix("/*") else {
        return Err(XpmError::Invalid("missing XPM header comment".to_string()));
    };
    match after.split_once("*/") {
        Some((comment, _)) if comment.trim() == "XPM" => {}
        _ => return Err(XpmError::Invalid("missing XPM header comment".to_string())),
    }

    let mut strings = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        Some('/') if prev == '*' => break,
                        Some(c) => prev = c,
                        None => return Err(XpmError::Invalid("unterminated comment".to_string())),
                    }
                }
            }
            '"' => {
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => s.push(escaped),
                            None => break,
                        },
                        Some(c) => s.push(c),
                        None => return Err(XpmError::Invalid("unterminated string".to_string())),
                    }
                }
                strings.push(s);
            }
            _ => {}
        }
    }
    Ok(strings)
}

/// Encode a pixmap as XPM3 text under the C identifier derived from `name`.
///
/// All palette keys must have the same length.
pub fn write<W: Write>(w: &mut W, name: &str, pixmap: &Pixmap) -> Result<(), XpmError> {
    let cpp = pixmap.palette.first().map_or(1, |e| e.key.chars().count());
    if let Some(entry) = pixmap
        .palette
        .iter()
        .find(|e| e.key.chars().count() != cpp)
    {
        return Err(XpmError::Color(format!(
            "key \"{}\" is not {cpp} characters long",
            entry.key
        )));
    }

    writeln!(w, "/* XPM */")?;
    writeln!(w, "static char *{}[] = {{", identifier(name))?;
    writeln!(w, "/* columns rows colors chars-per-pixel */")?;
    write!(
        w,
        "\"{} {} {} {} \"",
        pixmap.width,
        pixmap.height,
        pixmap.palette.len(),
        cpp
    )?;
    for entry in &pixmap.palette {
        write!(w, ",\n\"{} c {}\"", escape(&entry.key), escape(&entry.color))?;
    }
    write!(w, ",\n/* pixels */")?;
    for (y, row) in pixmap.rows().enumerate() {
        let mut line = String::with_capacity(row.len() * cpp);
        for &pixel in row {
            let entry = pixmap.palette.get(pixel as usize).ok_or_else(|| {
                XpmError::Color(format!("pixel {pixel} in row {y} outside palette"))
            })?;
            line.push_str(&entry.key);
        }
        write!(w, "\n\"{}\"", escape(&line))?;
        if y + 1 < pixmap.height {
            write!(w, ",")?;
        }
    }
    writeln!(w, "\n}};")?;
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Turn a file stem into a valid C identifier.
fn identifier(name: &str) -> String {
    let mut id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}
