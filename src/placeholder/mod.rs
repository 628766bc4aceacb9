//! Procedural fallback artwork: a gradient canvas with random circles and
//! strokes, the prompt printed in the middle and a thin frame.

pub mod caption;
pub mod fonts;

use crate::CANVAS_SIZE;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;

pub use caption::caption;
pub use fonts::{CaptionFont, FontSource};

pub const PALETTE: [Rgb<u8>; 6] = [
    Rgb([0xff, 0x6b, 0x6b]),
    Rgb([0x4e, 0xcd, 0xc4]),
    Rgb([0x45, 0xb7, 0xd1]),
    Rgb([0x96, 0xce, 0xb4]),
    Rgb([0xfe, 0xca, 0x57]),
    Rgb([0xff, 0x9f, 0xf3]),
];

pub const CIRCLE_COUNT: usize = 8;
pub const MIN_RADIUS: i32 = 20;
pub const MAX_RADIUS: i32 = 60;
pub const LINE_COUNT: usize = 5;
pub const STROKE_WIDTH: i32 = 3;
pub const BORDER_WIDTH: u32 = 3;
pub const BORDER_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const TEXT_MARGIN: u32 = 16;

/// Background channels at (x, y) before clamping.
pub fn gradient_channels(x: u32, y: u32) -> [i32; 3] {
    let fx = x as f64 / CANVAS_SIZE as f64;
    let fy = y as f64 / CANVAS_SIZE as f64;
    [
        (26.0 + fx * 150.0 + fy * 50.0) as i32,
        (26.0 + fy * 150.0 + fx * 30.0) as i32,
        (46.0 + fx * 100.0 + fy * 150.0) as i32,
    ]
}

pub fn gradient_pixel(x: u32, y: u32) -> Rgb<u8> {
    let [r, g, b] = gradient_channels(x, y);
    Rgb([
        r.clamp(0, 255) as u8,
        g.clamp(0, 255) as u8,
        b.clamp(0, 255) as u8,
    ])
}

pub fn gradient_background() -> RgbImage {
    RgbImage::from_fn(CANVAS_SIZE, CANVAS_SIZE, gradient_pixel)
}

fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb<u8> {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

fn draw_circles<R: Rng + ?Sized>(canvas: &mut RgbImage, rng: &mut R) {
    let size = CANVAS_SIZE as i32;
    for _ in 0..CIRCLE_COUNT {
        let color = pick_color(rng);
        let radius = rng.gen_range(MIN_RADIUS..=MAX_RADIUS);
        let cx = rng.gen_range(radius..=size - 1 - radius);
        let cy = rng.gen_range(radius..=size - 1 - radius);
        draw_filled_circle_mut(canvas, (cx, cy), radius, color);
    }
}

/// Approximates a stroke of `STROKE_WIDTH` px with parallel one-pixel
/// segments offset along the minor axis.
fn draw_stroke(canvas: &mut RgbImage, start: (f32, f32), end: (f32, f32), color: Rgb<u8>) {
    let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
    let half = STROKE_WIDTH / 2;
    for offset in -half..=half {
        let d = offset as f32;
        let (from, to) = if steep {
            ((start.0 + d, start.1), (end.0 + d, end.1))
        } else {
            ((start.0, start.1 + d), (end.0, end.1 + d))
        };
        draw_line_segment_mut(canvas, from, to, color);
    }
}

fn draw_strokes<R: Rng + ?Sized>(canvas: &mut RgbImage, rng: &mut R) {
    for _ in 0..LINE_COUNT {
        let color = pick_color(rng);
        let start = (
            rng.gen_range(0..CANVAS_SIZE) as f32,
            rng.gen_range(0..CANVAS_SIZE) as f32,
        );
        let end = (
            rng.gen_range(0..CANVAS_SIZE) as f32,
            rng.gen_range(0..CANVAS_SIZE) as f32,
        );
        draw_stroke(canvas, start, end, color);
    }
}

fn draw_border(canvas: &mut RgbImage) {
    let (width, height) = canvas.dimensions();
    for inset in 0..BORDER_WIDTH {
        let rect = Rect::at(inset as i32, inset as i32)
            .of_size(width - 2 * inset, height - 2 * inset);
        draw_hollow_rect_mut(canvas, rect, BORDER_COLOR);
    }
}

/// Renders placeholder images. The caption font is resolved once, when the
/// synthesizer is built.
pub struct PlaceholderSynthesizer {
    font: CaptionFont,
}

impl PlaceholderSynthesizer {
    pub fn new(chain: &[FontSource]) -> Self {
        let font = fonts::resolve_font(chain);
        if font.is_builtin() {
            log::warn!("⚠️  No TrueType font found, captions use the built-in bitmap font");
        }
        Self { font }
    }

    /// Default font chain with `bundled` as the shipped font file.
    pub fn with_bundled_font(bundled: impl Into<PathBuf>) -> Self {
        Self::new(&fonts::default_chain(bundled))
    }

    pub fn builtin() -> Self {
        Self {
            font: CaptionFont::Bitmap,
        }
    }

    pub fn font(&self) -> &CaptionFont {
        &self.font
    }

    pub fn synthesize(&self, prompt: &str) -> RgbImage {
        let mut rng = StdRng::from_entropy();
        self.synthesize_with_rng(prompt, &mut rng)
    }

    pub fn synthesize_with_rng<R: Rng + ?Sized>(&self, prompt: &str, rng: &mut R) -> RgbImage {
        let mut canvas = gradient_background();
        draw_circles(&mut canvas, rng);
        draw_strokes(&mut canvas, rng);
        caption::draw_caption(&mut canvas, &self.font, &caption(prompt), TEXT_MARGIN);
        draw_border(&mut canvas);
        canvas
    }
}
