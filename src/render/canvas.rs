//! Braille sub-pixel canvas.
//!
//! Every cell is split into a 2×4 grid of dots, giving twice the horizontal
//! and four times the vertical resolution of the character grid. Effects
//! rasterize into a fresh canvas each frame and then collapse it onto the
//! surface with [`SubpixelCanvas::render`].

use super::{Style, Surface};
use crate::colors::Rgb;

/// First codepoint of the Unicode braille block (no dots raised)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for column `x` (0..2) and row `y` (0..4) within a cell
const DOT_BITS: [[u32; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

pub struct SubpixelCanvas {
    cells_wide: usize,
    cells_high: usize,
    /// Row-major dots; `Some(color)` when lit
    dots: Vec<Option<Rgb>>,
}

impl SubpixelCanvas {
    pub fn new(cells_wide: usize, cells_high: usize) -> Self {
        Self {
            cells_wide,
            cells_high,
            dots: vec![None; cells_wide * 2 * cells_high * 4],
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.cells_wide * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.cells_high * 4
    }

    /// Light dot (x, y); coordinates outside the canvas are ignored
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.pixel_width() && y < self.pixel_height() {
            let width = self.pixel_width();
            self.dots[y * width + x] = Some(color);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.pixel_width() && y < self.pixel_height() && self.dot(x, y).is_some()
    }

    /// Bresenham line, both endpoints included
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Collapse the dots onto `surface`, one braille glyph per cell.
    ///
    /// The cell color comes from the lit dot nearest the top-left corner.
    /// Cells without lit dots are not written.
    pub fn render(&self, surface: &mut dyn Surface, offset_x: usize, offset_y: usize) {
        for cy in 0..self.cells_high {
            for cx in 0..self.cells_wide {
                let mut bits = 0;
                let mut color = None;
                let mut best_priority = -1;

                for dy in 0..4 {
                    for dx in 0..2 {
                        if let Some(dot_color) = self.dot(cx * 2 + dx, cy * 4 + dy) {
                            bits |= DOT_BITS[dx][dy];
                            let priority = dot_priority(dx, dy);
                            if priority > best_priority {
                                best_priority = priority;
                                color = Some(dot_color);
                            }
                        }
                    }
                }

                if bits == 0 {
                    continue;
                }
                let glyph = char::from_u32(BRAILLE_BASE | bits).unwrap_or(' ');
                let style = Style {
                    fg: color,
                    ..Style::default()
                };
                surface.set_content(offset_x + cx, offset_y + cy, glyph, style);
            }
        }
    }

    fn dot(&self, x: usize, y: usize) -> Option<Rgb> {
        self.dots[y * self.pixel_width() + x]
    }
}

/// Color precedence of a dot inside its cell: top rows first, then left column
fn dot_priority(dx: usize, dy: usize) -> i32 {
    (3 - dy as i32) * 2 + (1 - dx as i32)
}
