use super::fonts::{CaptionFont, LINE_SPACING};
use image::{Rgb, RgbImage};

pub const SHADOW_OFFSET: i32 = 2;
const SHADOW: Rgb<u8> = Rgb([0, 0, 0]);
const INK: Rgb<u8> = Rgb([255, 255, 255]);

pub fn caption(prompt: &str) -> String {
    format!("AI Generated Image\n\nPrompt: {}\n\n(Placeholder)", prompt)
}

/// Caption broken into lines no wider than `max_width`, plus the block's
/// bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLayout {
    pub lines: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub line_height: u32,
}

pub fn layout(font: &CaptionFont, text: &str, max_width: u32) -> CaptionLayout {
    let lines: Vec<String> = text
        .split('\n')
        .flat_map(|line| wrap_line(font, line, max_width))
        .collect();

    let line_height = font.line_height();
    let width = lines
        .iter()
        .map(|line| font.text_width(line))
        .max()
        .unwrap_or(0);
    let count = lines.len() as u32;
    let height = count * line_height + count.saturating_sub(1) * LINE_SPACING;

    CaptionLayout {
        lines,
        width,
        height,
        line_height,
    }
}

fn wrap_line(font: &CaptionFont, line: &str, max_width: u32) -> Vec<String> {
    if font.text_width(line) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if font.text_width(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if font.text_width(word) <= max_width {
            current = word.to_string();
            continue;
        }

        // Single word wider than the canvas: hard-break it.
        for c in word.chars() {
            current.push(c);
            if font.text_width(&current) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Centers the caption block and draws it with a drop shadow.
pub fn draw_caption(canvas: &mut RgbImage, font: &CaptionFont, text: &str, margin: u32) {
    let (width, height) = canvas.dimensions();
    let block = layout(font, text, width.saturating_sub(2 * margin));

    let x = (width as i32 - block.width as i32) / 2;
    let y = (height as i32 - block.height as i32) / 2;
    let step = (block.line_height + LINE_SPACING) as i32;

    for (offset, color) in [(SHADOW_OFFSET, SHADOW), (0, INK)] {
        for (index, line) in block.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_y = y + offset + index as i32 * step;
            font.draw_line(canvas, x + offset, line_y, color, line);
        }
    }
}
