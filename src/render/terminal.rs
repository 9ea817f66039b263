//! Crossterm-backed surface.
//!
//! Effects draw into a back buffer; [`TerminalSurface::show`] writes only the
//! cells that changed since the last flush.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use tracing::{debug, warn};

use super::{CellBuffer, Style, Surface};
use crate::error::Result;

pub struct TerminalSurface {
    out: Stdout,
    /// What the terminal currently shows
    front: CellBuffer,
    /// What the next `show` will display
    back: CellBuffer,
}

impl TerminalSurface {
    /// Enter raw mode and the alternate screen; restored on drop
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        crossterm::execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        debug!(width, height, "terminal initialized");

        Ok(Self {
            out,
            front: CellBuffer::new(width as usize, height as usize),
            back: CellBuffer::new(width as usize, height as usize),
        })
    }

    /// Wait up to `timeout` for an input event
    pub fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            let ev = event::read()?;
            if let Event::Resize(width, height) = ev {
                self.resize(width as usize, height as usize)?;
            }
            Ok(Some(ev))
        } else {
            Ok(None)
        }
    }

    /// Adopt a new terminal size; the next `show` repaints everything
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        debug!(width, height, "terminal resized");
        self.back.resize(width, height);
        self.front.resize(width, height);
        crossterm::execute!(self.out, terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    /// Flush pending cell changes to the terminal
    pub fn show(&mut self) -> Result<()> {
        let mut current = Style::default();
        queue!(self.out, SetAttribute(Attribute::Reset))?;

        for (x, y, cell) in self.back.changes(&self.front) {
            queue!(self.out, cursor::MoveTo(x as u16, y as u16))?;
            if cell.style != current {
                queue!(self.out, SetAttribute(Attribute::Reset))?;
                if let Some(fg) = cell.style.fg {
                    queue!(
                        self.out,
                        SetForegroundColor(Color::Rgb {
                            r: fg.r,
                            g: fg.g,
                            b: fg.b
                        })
                    )?;
                } else {
                    queue!(self.out, SetForegroundColor(Color::Reset))?;
                }
                if cell.style.dim {
                    queue!(self.out, SetAttribute(Attribute::Dim))?;
                }
                if cell.style.bold {
                    queue!(self.out, SetAttribute(Attribute::Bold))?;
                }
                current = cell.style;
            }
            queue!(self.out, Print(cell.glyph))?;
        }

        self.out.flush()?;
        self.front.clone_from(&self.back);
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (usize, usize) {
        self.back.size()
    }

    fn set_content(&mut self, x: usize, y: usize, glyph: char, style: Style) {
        self.back.set_content(x, y, glyph, style);
    }

    fn content(&self, x: usize, y: usize) -> Option<char> {
        self.back.content(x, y)
    }

    fn clear(&mut self) {
        self.back.clear();
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let restored = crossterm::execute!(
            self.out,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
        .and_then(|_| terminal::disable_raw_mode());
        if let Err(e) = restored {
            warn!("failed to restore terminal: {}", e);
        }
    }
}
