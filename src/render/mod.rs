// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rasterization of documents into character grids.
//!
//! The rasterizer produces a viewport-sized [`Canvas`] and, on request, a highlight index that
//! the TUI uses for cell-accurate selection highlighting.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::ShapeId;

mod diagram;
pub(crate) mod text;

pub use diagram::{rasterize, rasterize_annotated};

/// A contiguous span of highlighted cells within a single canvas row.
///
/// Coordinates are `(y, x0, x1)` in canvas cell indices, inclusive.
pub type LineSpan = (usize, usize, usize);

/// Mapping from shape ids to the spans that shape painted.
pub type HighlightIndex = BTreeMap<ShapeId, Vec<LineSpan>>;

/// Rasterized canvas plus an index suitable for per-shape highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedCanvas {
    pub canvas: Canvas,
    pub highlight_index: HighlightIndex,
}

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const ARROW_RIGHT: char = '▶';
pub const ARROW_LEFT: char = '◀';
pub const ARROW_UP: char = '▲';
pub const ARROW_DOWN: char = '▼';

/// Shown inside a borderless, empty box so it stays visible.
pub const EMPTY_BOX_PLACEHOLDER: &str = "[Text]";

/// A fixed-size, bounds-checked character grid.
///
/// Collision behavior is plain overwrite: the last writer wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    /// A blank `width` x `height` canvas.
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let Some(len) = width.checked_mul(height) else {
            return Err(CanvasError::AreaOverflow { width, height });
        };
        Ok(Self {
            width,
            height,
            cells: vec![' '; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        self.cells[idx] = ch;
        Ok(())
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> + '_ {
        // `chunks` panics on zero; a zero-width canvas has no cells anyway.
        self.cells.chunks(self.width.max(1))
    }

    /// Plain text with trailing spaces and trailing blank rows removed.
    pub fn to_string_trimmed(&self) -> String {
        text::canvas_to_string_trimmed(self)
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok((y * self.width) + x)
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for (y, row) in self.rows().enumerate() {
            for ch in row {
                f.write_char(*ch)?;
            }
            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow {
        width: usize,
        height: usize,
    },
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "out of bounds: ({x},{y}) for {width}x{height} canvas")
            }
        }
    }
}

impl std::error::Error for CanvasError {}
