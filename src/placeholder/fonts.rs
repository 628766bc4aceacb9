use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fs;
use std::path::{Path, PathBuf};

pub const CAPTION_PX: f32 = 18.0;
pub const LINE_SPACING: u32 = 4;

/// Pixel scale applied to the 8×8 bitmap glyphs.
const BITMAP_SCALE: u32 = 2;
const BITMAP_CELL: u32 = 8 * BITMAP_SCALE;

/// Well-known locations of the preferred caption typefaces.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

/// One step of the font resolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    System(Vec<PathBuf>),
    Bundled(PathBuf),
    Builtin,
}

impl FontSource {
    fn load(&self) -> Option<CaptionFont> {
        match self {
            FontSource::System(candidates) => candidates.iter().find_map(|path| load_vector(path)),
            FontSource::Bundled(path) => load_vector(path),
            FontSource::Builtin => Some(CaptionFont::Bitmap),
        }
    }
}

fn load_vector(path: &Path) -> Option<CaptionFont> {
    let bytes = fs::read(path).ok()?;
    match FontVec::try_from_vec(bytes) {
        Ok(font) => {
            log::debug!("Caption font loaded from {}", path.display());
            Some(CaptionFont::Vector(font))
        }
        Err(e) => {
            log::warn!("Ignoring unreadable font {}: {}", path.display(), e);
            None
        }
    }
}

/// Default chain: system fonts, then the bundled file, then the bitmap font.
///
/// No font file ships with the crate. The bundled step only loads when a
/// TrueType file has been placed at `bundled` (`FONT_PATH`), otherwise a host
/// without the system fonts draws captions with the bitmap font.
pub fn default_chain(bundled: impl Into<PathBuf>) -> Vec<FontSource> {
    vec![
        FontSource::System(SYSTEM_FONT_PATHS.iter().map(PathBuf::from).collect()),
        FontSource::Bundled(bundled.into()),
        FontSource::Builtin,
    ]
}

/// First source in `chain` that loads. Falls back to the bitmap font even if
/// the chain forgot to end with `FontSource::Builtin`.
pub fn resolve_font(chain: &[FontSource]) -> CaptionFont {
    chain
        .iter()
        .find_map(FontSource::load)
        .unwrap_or(CaptionFont::Bitmap)
}

pub enum CaptionFont {
    Vector(FontVec),
    Bitmap,
}

impl CaptionFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self, CaptionFont::Bitmap)
    }

    pub fn line_height(&self) -> u32 {
        match self {
            CaptionFont::Vector(font) => {
                font.as_scaled(PxScale::from(CAPTION_PX)).height().ceil() as u32
            }
            CaptionFont::Bitmap => BITMAP_CELL,
        }
    }

    pub fn text_width(&self, text: &str) -> u32 {
        match self {
            CaptionFont::Vector(font) => text_size(PxScale::from(CAPTION_PX), font, text).0,
            CaptionFont::Bitmap => text.chars().count() as u32 * BITMAP_CELL,
        }
    }

    /// Draws one line with its top-left corner at (x, y). Pixels outside the
    /// canvas are clipped.
    pub fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        match self {
            CaptionFont::Vector(font) => {
                draw_text_mut(canvas, color, x, y, PxScale::from(CAPTION_PX), font, text)
            }
            CaptionFont::Bitmap => draw_bitmap_line(canvas, x, y, color, text),
        }
    }
}

fn bitmap_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| GREEK_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_bitmap_line(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    for (index, c) in text.chars().enumerate() {
        let origin_x = x + (index as u32 * BITMAP_CELL) as i32;
        if origin_x >= width {
            break;
        }
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..BITMAP_SCALE {
                    for dx in 0..BITMAP_SCALE {
                        let px = origin_x + (col * BITMAP_SCALE + dx) as i32;
                        let py = y + (row as u32 * BITMAP_SCALE + dy) as i32;
                        if px >= 0 && py >= 0 && px < width && py < height {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_of_missing_files_ends_in_builtin() {
        let chain = vec![
            FontSource::System(vec![PathBuf::from("/nonexistent/Arial.ttf")]),
            FontSource::Bundled(PathBuf::from("/nonexistent/bundled.ttf")),
            FontSource::Builtin,
        ];
        assert!(resolve_font(&chain).is_builtin());
    }

    #[test]
    fn test_empty_chain_still_yields_a_font() {
        assert!(resolve_font(&[]).is_builtin());
    }

    #[test]
    fn test_corrupt_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"not a font").unwrap();
        let chain = vec![FontSource::Bundled(path), FontSource::Builtin];
        assert!(resolve_font(&chain).is_builtin());
    }

    #[test]
    fn test_bitmap_metrics() {
        let font = CaptionFont::Bitmap;
        assert_eq!(font.line_height(), 16);
        assert_eq!(font.text_width("abc"), 48);
        assert_eq!(font.text_width("é✓"), 32);
    }

    #[test]
    fn test_bitmap_draw_clips_at_edges() {
        let mut canvas = RgbImage::new(20, 20);
        let white = Rgb([255, 255, 255]);
        CaptionFont::Bitmap.draw_line(&mut canvas, -5, -5, white, "HELLO WORLD");
        CaptionFont::Bitmap.draw_line(&mut canvas, 10, 10, white, "✓");
        assert!(canvas.pixels().any(|p| *p == white));
    }
}
