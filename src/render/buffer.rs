//! In-memory cell grid.

use super::{Style, Surface};

/// One character cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            style: Style::default(),
        }
    }
}

/// Row-major grid of cells, used as the terminal back buffer and in tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Resize and blank the grid
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width * height];
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Cells that differ from `previous`, with their coordinates.
    ///
    /// Every cell is reported when the sizes differ.
    pub fn changes<'a>(
        &'a self,
        previous: &'a CellBuffer,
    ) -> impl Iterator<Item = (usize, usize, &'a Cell)> + 'a {
        let same_size = self.width == previous.width && self.height == previous.height;
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(i, cell)| !same_size || previous.cells[i] != *cell)
            .map(move |(i, cell)| (i % self.width.max(1), i / self.width.max(1), cell))
    }

    /// Glyphs of row `y` as a string (blank cells included)
    pub fn row_text(&self, y: usize) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.glyph)
            .collect()
    }

    /// Number of non-blank cells
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl Surface for CellBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_content(&mut self, x: usize, y: usize, glyph: char, style: Style) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { glyph, style };
        }
    }

    fn content(&self, x: usize, y: usize) -> Option<char> {
        self.get(x, y).map(|c| c.glyph)
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgb;

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut buf = CellBuffer::new(3, 2);
        buf.set_content(3, 0, 'x', Style::default());
        buf.set_content(0, 2, 'x', Style::default());
        assert_eq!(buf.lit_cells(), 0);
        assert_eq!(buf.content(5, 5), None);
    }

    #[test]
    fn test_changes_reports_only_differences() {
        let previous = CellBuffer::new(4, 2);
        let mut current = previous.clone();
        current.set_content(2, 1, '█', Style::fg(Rgb::new(1, 2, 3)));

        let changes: Vec<_> = current.changes(&previous).collect();
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].0, changes[0].1), (2, 1));
        assert_eq!(changes[0].2.glyph, '█');
    }

    #[test]
    fn test_changes_after_resize_reports_everything() {
        let previous = CellBuffer::new(2, 2);
        let current = CellBuffer::new(3, 1);
        assert_eq!(current.changes(&previous).count(), 3);
    }

    #[test]
    fn test_clear_and_row_text() {
        let mut buf = CellBuffer::new(3, 1);
        buf.set_content(1, 0, 'a', Style::default());
        assert_eq!(buf.row_text(0), " a ");
        buf.clear();
        assert_eq!(buf.row_text(0), "   ");
    }
}
