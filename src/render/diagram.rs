// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::shape::span_rect;
use crate::model::{
    BorderStyle, BoxShape, Connector, Direction, Document, Orientation, Point, Rect, ShapeKind,
    Size,
};

use super::{
    AnnotatedCanvas, Canvas, CanvasError, HighlightIndex, LineSpan, ARROW_DOWN, ARROW_LEFT,
    ARROW_RIGHT, ARROW_UP, BOX_BOTTOM_LEFT, BOX_BOTTOM_RIGHT, BOX_HORIZONTAL, BOX_TOP_LEFT,
    BOX_TOP_RIGHT, BOX_VERTICAL, EMPTY_BOX_PLACEHOLDER,
};

/// Draws `document` in z-order into a canvas covering `viewport`.
///
/// Cells outside the viewport are clipped; a viewport with a non-positive dimension yields an
/// empty canvas.
pub fn rasterize(document: &Document, viewport: Rect) -> Result<Canvas, CanvasError> {
    let mut canvas = blank_canvas(viewport)?;
    let mut painter = Painter::new(&mut canvas, viewport.top_left, false);
    for shape in document.shapes() {
        draw_shape(&mut painter, shape.kind());
    }
    Ok(canvas)
}

/// Like [`rasterize`], additionally recording which cells each shape painted.
pub fn rasterize_annotated(
    document: &Document,
    viewport: Rect,
) -> Result<AnnotatedCanvas, CanvasError> {
    let mut canvas = blank_canvas(viewport)?;
    let mut highlight_index = HighlightIndex::new();

    let mut painter = Painter::new(&mut canvas, viewport.top_left, true);
    for shape in document.shapes() {
        draw_shape(&mut painter, shape.kind());
        let spans = painter.take_spans();
        if !spans.is_empty() {
            highlight_index.insert(shape.id().clone(), spans);
        }
    }

    Ok(AnnotatedCanvas {
        canvas,
        highlight_index,
    })
}

fn blank_canvas(viewport: Rect) -> Result<Canvas, CanvasError> {
    let width = usize::try_from(viewport.size.width).unwrap_or(0);
    let height = usize::try_from(viewport.size.height).unwrap_or(0);
    Canvas::new(width, height)
}

/// Maps document points onto the canvas, dropping anything outside.
struct Painter<'a> {
    canvas: &'a mut Canvas,
    origin: Point,
    touched: Option<Vec<(usize, usize)>>,
}

impl<'a> Painter<'a> {
    fn new(canvas: &'a mut Canvas, origin: Point, record: bool) -> Self {
        Self {
            canvas,
            origin,
            touched: record.then(Vec::new),
        }
    }

    fn to_canvas(&self, point: Point) -> Option<(usize, usize)> {
        let rel = point - self.origin;
        let x = usize::try_from(rel.col).ok()?;
        let y = usize::try_from(rel.row).ok()?;
        self.canvas.in_bounds(x, y).then_some((x, y))
    }

    fn plot(&mut self, point: Point, ch: char) {
        let Some((x, y)) = self.to_canvas(point) else {
            return;
        };
        if self.canvas.set(x, y, ch).is_ok() {
            if let Some(touched) = self.touched.as_mut() {
                touched.push((x, y));
            }
        }
    }

    fn area(&self) -> Rect {
        let width = i32::try_from(self.canvas.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.canvas.height()).unwrap_or(i32::MAX);
        Rect::new(self.origin, Size::new(width, height))
    }

    /// Rows of `rect` that fall inside the canvas.
    fn visible_rows(&self, rect: Rect) -> std::ops::RangeInclusive<i32> {
        let area = self.area();
        rect.top().max(area.top())..=rect.bottom().min(area.bottom())
    }

    fn visible_cols(&self, rect: Rect) -> std::ops::RangeInclusive<i32> {
        let area = self.area();
        rect.left().max(area.left())..=rect.right().min(area.right())
    }

    fn take_spans(&mut self) -> Vec<LineSpan> {
        let Some(touched) = self.touched.as_mut() else {
            return Vec::new();
        };
        let mut cells = std::mem::take(touched);
        cells.sort_by_key(|(x, y)| (*y, *x));
        cells.dedup();

        let mut spans = Vec::<LineSpan>::new();
        for (x, y) in cells {
            match spans.last_mut() {
                Some((span_y, _, x1)) if *span_y == y && *x1 + 1 == x => *x1 = x,
                _ => spans.push((y, x, x)),
            }
        }
        spans
    }
}

fn draw_shape(painter: &mut Painter<'_>, kind: &ShapeKind) {
    match kind {
        ShapeKind::Box(shape) => draw_box(painter, shape),
        ShapeKind::Line(connector) => draw_connector(painter, connector, false),
        ShapeKind::Arrow(connector) => draw_connector(painter, connector, true),
    }
}

fn draw_box(painter: &mut Painter<'_>, shape: &BoxShape) {
    let rect = shape.rect();

    if shape.border() == BorderStyle::Visible {
        for col in painter.visible_cols(rect) {
            for row in [rect.top(), rect.bottom()] {
                let point = Point::new(row, col);
                painter.plot(point, border_glyph(rect, point));
            }
        }
        for row in painter.visible_rows(rect) {
            for col in [rect.left(), rect.right()] {
                let point = Point::new(row, col);
                painter.plot(point, border_glyph(rect, point));
            }
        }
    }

    let Some(interior) = rect.interior() else {
        return;
    };

    for row in painter.visible_rows(interior) {
        for col in painter.visible_cols(interior) {
            painter.plot(Point::new(row, col), ' ');
        }
    }

    let placeholder = [EMPTY_BOX_PLACEHOLDER.to_owned()];
    let lines = if shape.text().is_empty() && shape.border() == BorderStyle::Hidden {
        &placeholder[..]
    } else {
        shape.text()
    };

    let max_lines = usize::try_from(interior.size.height).unwrap_or(0);
    let max_cols = usize::try_from(interior.size.width).unwrap_or(0);
    for (row, line) in (interior.top()..).zip(lines.iter().take(max_lines)) {
        for (col, ch) in (interior.left()..).zip(line.chars().take(max_cols)) {
            painter.plot(Point::new(row, col), ch);
        }
    }
}

fn border_glyph(rect: Rect, point: Point) -> char {
    let top = point.row == rect.top();
    let bottom = point.row == rect.bottom();
    let left = point.col == rect.left();
    let right = point.col == rect.right();
    match (top, bottom, left, right) {
        (true, _, true, _) => BOX_TOP_LEFT,
        (true, _, _, true) => BOX_TOP_RIGHT,
        (_, true, true, _) => BOX_BOTTOM_LEFT,
        (_, true, _, true) => BOX_BOTTOM_RIGHT,
        (true, _, _, _) | (_, true, _, _) => BOX_HORIZONTAL,
        _ => BOX_VERTICAL,
    }
}

fn draw_connector(painter: &mut Painter<'_>, connector: &Connector, arrow: bool) {
    let legs = connector.legs();

    for (from, to) in &legs {
        let glyph = segment_glyph(*from, *to, connector.orientation());
        let leg = span_rect(*from, *to);
        for row in painter.visible_rows(leg) {
            for col in painter.visible_cols(leg) {
                painter.plot(Point::new(row, col), glyph);
            }
        }
    }

    if let Some(corner) = connector.corner() {
        painter.plot(corner, corner_glyph(connector, corner));
    }

    if arrow {
        painter.plot(connector.end().point, arrow_glyph(connector.end_direction()));
    }
}

fn segment_glyph(from: Point, to: Point, orientation: Orientation) -> char {
    if from.row == to.row && from.col != to.col {
        BOX_HORIZONTAL
    } else if from.col == to.col && from.row != to.row {
        BOX_VERTICAL
    } else {
        match orientation {
            Orientation::Horizontal => BOX_HORIZONTAL,
            Orientation::Vertical => BOX_VERTICAL,
        }
    }
}

/// The bend joins the endpoint sharing its row with the one sharing its column.
fn corner_glyph(connector: &Connector, corner: Point) -> char {
    let (start, end) = (connector.start().point, connector.end().point);
    let (row_neighbor, col_neighbor) = if start.row == corner.row {
        (start, end)
    } else {
        (end, start)
    };

    let opens_left = row_neighbor.col < corner.col;
    let opens_up = col_neighbor.row < corner.row;
    match (opens_left, opens_up) {
        (true, false) => BOX_TOP_RIGHT,
        (true, true) => BOX_BOTTOM_RIGHT,
        (false, false) => BOX_TOP_LEFT,
        (false, true) => BOX_BOTTOM_LEFT,
    }
}

fn arrow_glyph(direction: Direction) -> char {
    match direction {
        Direction::Right => ARROW_RIGHT,
        Direction::Left => ARROW_LEFT,
        Direction::Down => ARROW_DOWN,
        Direction::Up => ARROW_UP,
    }
}
