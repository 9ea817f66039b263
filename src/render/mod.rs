//! Character-cell display: the surface abstraction, an in-memory cell
//! buffer, the braille sub-pixel canvas and the crossterm backend.

mod buffer;
mod canvas;
mod terminal;

pub use buffer::{Cell, CellBuffer};
pub use canvas::SubpixelCanvas;
pub use terminal::TerminalSurface;

use crate::colors::Rgb;

/// Foreground color and attributes of one cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// `None` keeps the terminal's default foreground
    pub fg: Option<Rgb>,
    pub dim: bool,
    pub bold: bool,
}

impl Style {
    pub fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    pub fn dim(self) -> Self {
        Self { dim: true, ..self }
    }

    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

/// Grid of glyph cells that effects draw into.
///
/// Writes outside the grid are ignored.
pub trait Surface {
    /// (width, height) in cells
    fn size(&self) -> (usize, usize);

    fn set_content(&mut self, x: usize, y: usize, glyph: char, style: Style);

    /// Glyph currently at (x, y), `None` outside the grid
    fn content(&self, x: usize, y: usize) -> Option<char>;

    /// Reset every cell to a blank
    fn clear(&mut self);
}
