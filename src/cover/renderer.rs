//! Raster cover renderer: parchment field, ink lettering.
//!
//! Text is drawn with the built-in bitmap font scaled up. Pure pixel work,
//! no drawing crate. Title sits in the upper third, word-wrapped and
//! centered; the author line sits near the foot.

use std::path::Path;

use image::{Rgb, RgbImage};

use super::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::{CoverError, CoverRenderer};
use crate::config;

/// Side margin, px.
const MARGIN: u32 = 100;

/// Vertical offset of the title block / author block from the edges, px.
const VERTICAL_INSET: u32 = 250;

/// Character budget per title line before wrapping.
const TITLE_WRAP_CHARS: usize = 12;

/// Pixel size of one font unit, capped so short titles stay plausible.
const MAX_TITLE_SCALE: u32 = 24;
const MAX_AUTHOR_SCALE: u32 = 10;

/// Vertical gap between lines, in font units.
const LEADING: u32 = 3;

pub struct BitmapCoverRenderer {
    width: u32,
    height: u32,
}

impl BitmapCoverRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for BitmapCoverRenderer {
    fn default() -> Self {
        Self::new(config::COVER_WIDTH, config::COVER_HEIGHT)
    }
}

impl CoverRenderer for BitmapCoverRenderer {
    fn render(&self, title: &str, author: &str, out: &Path) -> Result<(), CoverError> {
        let background = Rgb(config::COVER_BACKGROUND);
        let ink = Rgb(config::COVER_INK);
        let mut canvas = RgbImage::from_pixel(self.width, self.height, background);

        let avail = self.width.saturating_sub(2 * MARGIN);

        let title_lines = wrap_words(title, TITLE_WRAP_CHARS);
        let title_scale = fit_scale(&title_lines, avail, MAX_TITLE_SCALE);
        draw_block(
            &mut canvas,
            &title_lines,
            title_scale,
            VERTICAL_INSET,
            ink,
        );

        let author_lines = vec![author.to_string()];
        let author_scale = fit_scale(&author_lines, avail, MAX_AUTHOR_SCALE);
        let author_height = block_height(&author_lines, author_scale);
        let author_top = self
            .height
            .saturating_sub(VERTICAL_INSET + author_height);
        draw_block(&mut canvas, &author_lines, author_scale, author_top, ink);

        canvas.save(out).map_err(|e| CoverError::Write {
            path: out.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            path = %out.display(),
            width = self.width,
            height = self.height,
            "Cover rendered"
        );
        Ok(())
    }
}

/// Greedy word wrap with hard splits for words longer than the budget.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split: String = word.chars().take(max_chars).collect();
            lines.push(split.clone());
            word = &word[split.len()..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Largest scale at which every line fits the available width.
fn fit_scale(lines: &[String], avail_px: u32, max_scale: u32) -> u32 {
    let longest = lines
        .iter()
        .map(|l| l.chars().count() as u32)
        .max()
        .unwrap_or(1)
        .max(1);
    (avail_px / (longest * ADVANCE)).clamp(1, max_scale)
}

fn block_height(lines: &[String], scale: u32) -> u32 {
    let line_height = (GLYPH_HEIGHT + LEADING) * scale;
    line_height * lines.len() as u32
}

/// Draw centered lines of text starting at `top`.
fn draw_block(canvas: &mut RgbImage, lines: &[String], scale: u32, top: u32, ink: Rgb<u8>) {
    let line_height = (GLYPH_HEIGHT + LEADING) * scale;

    for (row, line) in lines.iter().enumerate() {
        let line_width = line.chars().count() as u32 * ADVANCE * scale;
        let x0 = canvas.width().saturating_sub(line_width) / 2;
        let y0 = top + row as u32 * line_height;

        for (col, c) in line.chars().enumerate() {
            let x = x0 + col as u32 * ADVANCE * scale;
            draw_glyph(canvas, c, x, y0, scale, ink);
        }
    }
}

fn draw_glyph(canvas: &mut RgbImage, c: char, x: u32, y: u32, scale: u32, ink: Rgb<u8>) {
    let rows = font::glyph(c);
    for (r, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let px = x + col * scale;
            let py = y + r as u32 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    let (cx, cy) = (px + dx, py + dy);
                    if cx < canvas.width() && cy < canvas.height() {
                        canvas.put_pixel(cx, cy, ink);
                    }
                }
            }
        }
    }
}
