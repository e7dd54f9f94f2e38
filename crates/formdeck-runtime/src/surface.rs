#![forbid(unsafe_code)]

//! Character-cell drawing surface.
//!
//! A [`Surface`] is a flat grid of styled grapheme cells. Views draw into
//! it with column coordinates; [`Surface::present`] writes the whole frame
//! to the terminal in one queued pass. The frames here are small, so the
//! surface redraws wholesale instead of diffing.
//!
//! Wide graphemes occupy their display width: the glyph lands in the first
//! cell and the covered cells are marked as continuations, which `present`
//! skips.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
pub use crossterm::style::Color;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Visual attributes for a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// Foreground color, terminal default when `None`.
    pub fg: Option<Color>,
    /// Bold attribute.
    pub bold: bool,
    /// Reverse-video attribute.
    pub reverse: bool,
}

impl Style {
    /// The terminal's default style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bold: false,
            reverse: false,
        }
    }

    /// With a foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// With bold set.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// With reverse video set.
    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// One grid cell: a grapheme cluster plus its style. An empty symbol marks
/// the continuation of a wide grapheme to its left.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    symbol: String,
    style: Style,
}

impl Cell {
    fn blank() -> Self {
        Self {
            symbol: " ".to_string(),
            style: Style::new(),
        }
    }

    fn continuation() -> Self {
        Self {
            symbol: String::new(),
            style: Style::new(),
        }
    }
}

/// A full-frame character grid.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Surface {
    /// Create a blank surface of the given size.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(); width as usize * height as usize],
        }
    }

    /// Width in columns.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Resize and clear.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::blank(); width as usize * height as usize];
    }

    /// Reset every cell to a blank default-styled space.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Draw a string starting at `(x, y)`, clipping at the right edge.
    /// Returns the column after the last cell written.
    pub fn set_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let w = grapheme.width().max(1) as u16;
            if col >= self.width || self.width - col < w {
                break;
            }
            if y >= self.height {
                break;
            }
            let Some(idx) = self.index(col, y) else { break };
            self.cells[idx] = Cell {
                symbol: grapheme.to_string(),
                style,
            };
            for cover in 1..w {
                if let Some(idx) = self.index(col + cover, y) {
                    self.cells[idx] = Cell::continuation();
                }
            }
            col += w;
        }
        col
    }

    /// Fill an entire row with one repeated character.
    pub fn fill_row(&mut self, y: u16, ch: char, style: Style) {
        for x in 0..self.width {
            if let Some(idx) = self.index(x, y) {
                self.cells[idx] = Cell {
                    symbol: ch.to_string(),
                    style,
                };
            }
        }
    }

    /// The text content of one row, continuations elided. Trailing spaces
    /// are trimmed. Intended for tests and snapshots.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let mut row = String::new();
        for x in 0..self.width {
            if let Some(idx) = self.index(x, y) {
                row.push_str(&self.cells[idx].symbol);
            }
        }
        row.trim_end().to_string()
    }

    /// Write the whole frame to the terminal.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        let mut current = Style::new();
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        for y in 0..self.height {
            queue!(out, MoveTo(0, y))?;
            for x in 0..self.width {
                let Some(idx) = self.index(x, y) else { continue };
                let cell = &self.cells[idx];
                if cell.symbol.is_empty() {
                    // Covered by the wide grapheme to the left.
                    continue;
                }
                if cell.style != current {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                    if let Some(fg) = cell.style.fg {
                        queue!(out, SetForegroundColor(fg))?;
                    }
                    if cell.style.bold {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                    if cell.style.reverse {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    current = cell.style;
                }
                queue!(out, Print(cell.symbol.as_str()))?;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }
}
