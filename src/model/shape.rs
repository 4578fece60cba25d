// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::geom::{Offset, Point, Rect, Size};
use super::ids::ShapeId;
use crate::render::text::wrap_text;

pub const MIN_BOX_WIDTH: i32 = 3;
pub const MIN_BOX_HEIGHT: i32 = 3;

/// The tag of a shape, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Box,
    Line,
    Arrow,
}

impl ShapeType {
    /// Prefix used for generated ids (`box-3`, `arrow-7`, ...).
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Line => "line",
            Self::Arrow => "arrow",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    Visible,
    Hidden,
}

impl BorderStyle {
    pub fn toggled(self) -> Self {
        match self {
            Self::Visible => Self::Hidden,
            Self::Hidden => Self::Visible,
        }
    }
}

/// Whether `set_text` had to drop content to fit the box interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFit {
    Fits,
    Truncated,
}

/// A bordered rectangle with wrapped text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxShape {
    rect: Rect,
    text: Vec<String>,
    border: BorderStyle,
}

impl BoxShape {
    /// Creates an empty box; dimensions below the 3x3 floor are raised to it.
    pub fn new(top_left: Point, size: Size) -> Self {
        Self {
            rect: Rect::new(top_left, clamp_box_size(size)),
            text: Vec::new(),
            border: BorderStyle::Visible,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn top_left(&self) -> Point {
        self.rect.top_left
    }

    pub fn size(&self) -> Size {
        self.rect.size
    }

    /// Cells available for text inside the border.
    pub fn interior_size(&self) -> Size {
        Size::new(self.rect.size.width - 2, self.rect.size.height - 2)
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }

    /// The stored lines joined back into an editable buffer.
    pub fn text_buffer(&self) -> String {
        self.text.join("\n")
    }

    pub fn border(&self) -> BorderStyle {
        self.border
    }

    pub fn set_border(&mut self, border: BorderStyle) {
        self.border = border;
    }

    pub fn toggle_border(&mut self) {
        self.border = self.border.toggled();
    }

    pub fn translate(&mut self, offset: Offset) {
        self.rect = self.rect.translated(offset);
    }

    /// Grows or shrinks from the fixed top-left corner, clamping at the size floor.
    ///
    /// Text is kept as-is; rasterization clips whatever no longer fits the interior.
    pub fn resize(&mut self, d_width: i32, d_height: i32) -> Size {
        let requested = Size::new(
            self.rect.size.width.saturating_add(d_width),
            self.rect.size.height.saturating_add(d_height),
        );
        self.rect.size = clamp_box_size(requested);
        self.rect.size
    }

    /// Replaces the content, wrapping to the interior width and truncating to its height.
    pub fn set_text(&mut self, text: &str) -> TextFit {
        let interior = self.interior_size();
        let width = usize::try_from(interior.width).unwrap_or(0);
        let height = usize::try_from(interior.height).unwrap_or(0);

        let mut lines = wrap_text(text, width);
        let mut fit = TextFit::Fits;
        if lines.len() > height {
            lines.truncate(height);
            fit = TextFit::Truncated;
        }
        while matches!(lines.last(), Some(line) if line.is_empty()) {
            lines.pop();
        }

        self.text = lines;
        fit
    }

    /// Restores persisted content verbatim.
    pub(crate) fn with_text_lines(mut self, lines: Vec<String>) -> Self {
        self.text = lines;
        self
    }
}

fn clamp_box_size(size: Size) -> Size {
    Size::new(size.width.max(MIN_BOX_WIDTH), size.height.max(MIN_BOX_HEIGHT))
}

/// Which leg of a connector leaves the start point first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A weak link from a connector endpoint to a box, relative to the box's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub box_id: ShapeId,
    pub offset: Offset,
}

/// One end of a connector.
///
/// `point` is the resolved absolute position and is what gets rendered; the attachment
/// record only tells the tracker which box may drag it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub point: Point,
    pub attachment: Option<Attachment>,
}

impl Endpoint {
    pub fn free(point: Point) -> Self {
        Self {
            point,
            attachment: None,
        }
    }

    pub fn attached_box(&self) -> Option<&ShapeId> {
        self.attachment.as_ref().map(|attachment| &attachment.box_id)
    }

    pub fn is_attached_to(&self, box_id: &ShapeId) -> bool {
        self.attached_box() == Some(box_id)
    }
}

/// A line or arrow between two endpoints.
///
/// Axis-aligned connectors render as one straight segment. Otherwise the connector renders
/// as an elbow whose first leg follows `orientation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    start: Endpoint,
    end: Endpoint,
    orientation: Orientation,
}

impl Connector {
    pub fn new(start: Endpoint, end: Endpoint, orientation: Orientation) -> Self {
        Self {
            start,
            end,
            orientation,
        }
    }

    /// A free horizontal connector covering `length` cells starting at `start`.
    pub fn horizontal(start: Point, length: i32) -> Self {
        let span = length.max(1) - 1;
        Self::new(
            Endpoint::free(start),
            Endpoint::free(start.shifted(0, span)),
            Orientation::Horizontal,
        )
    }

    pub fn start(&self) -> &Endpoint {
        &self.start
    }

    pub fn end(&self) -> &Endpoint {
        &self.end
    }

    pub fn start_mut(&mut self) -> &mut Endpoint {
        &mut self.start
    }

    pub fn end_mut(&mut self) -> &mut Endpoint {
        &mut self.end
    }

    pub fn endpoints(&self) -> [&Endpoint; 2] {
        [&self.start, &self.end]
    }

    pub fn endpoints_mut(&mut self) -> [&mut Endpoint; 2] {
        [&mut self.start, &mut self.end]
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.start.point.row == self.end.point.row || self.start.point.col == self.end.point.col
    }

    pub fn translate(&mut self, offset: Offset) {
        self.start.point += offset;
        self.end.point += offset;
    }

    /// Swaps horizontal/vertical rendering around the fixed start point.
    ///
    /// A straight connector has its end rotated so the signed length is preserved; an elbow
    /// keeps both endpoints and only swaps which leg comes first. Returns whether the end
    /// point moved.
    pub fn toggle_orientation(&mut self) -> bool {
        self.orientation = self.orientation.toggled();
        if !self.is_axis_aligned() {
            return false;
        }

        let delta = self.end.point - self.start.point;
        let rotated = self.start.point + Offset::new(delta.col, delta.row);
        let moved = rotated != self.end.point;
        self.end.point = rotated;
        moved
    }

    /// The bend of an elbow connector, if it has one.
    pub fn corner(&self) -> Option<Point> {
        if self.is_axis_aligned() {
            return None;
        }
        let (start, end) = (self.start.point, self.end.point);
        Some(match self.orientation {
            Orientation::Horizontal => Point::new(start.row, end.col),
            Orientation::Vertical => Point::new(end.row, start.col),
        })
    }

    /// The straight legs from start to end (one or two).
    pub fn legs(&self) -> Vec<(Point, Point)> {
        match self.corner() {
            Some(corner) => vec![(self.start.point, corner), (corner, self.end.point)],
            None => vec![(self.start.point, self.end.point)],
        }
    }

    /// Whether `point` lies on one of the legs.
    pub fn covers(&self, point: Point) -> bool {
        self.legs()
            .into_iter()
            .any(|(from, to)| span_rect(from, to).contains(point))
    }

    /// Direction of travel into the end point along the last leg.
    ///
    /// A single-cell connector points along its orientation.
    pub fn end_direction(&self) -> Direction {
        let end = self.end.point;
        let from = self.corner().unwrap_or(self.start.point);
        let delta = end - from;
        if delta.col > 0 {
            Direction::Right
        } else if delta.col < 0 {
            Direction::Left
        } else if delta.row > 0 {
            Direction::Down
        } else if delta.row < 0 {
            Direction::Up
        } else {
            match self.orientation {
                Orientation::Horizontal => Direction::Right,
                Orientation::Vertical => Direction::Down,
            }
        }
    }

    pub fn bounds(&self) -> Rect {
        span_rect(self.start.point, self.end.point)
    }
}

/// The smallest rect holding both points. Extents past `i32::MAX` saturate.
pub(crate) fn span_rect(a: Point, b: Point) -> Rect {
    let extent = |from: i32, to: i32| {
        i32::try_from(from.abs_diff(to))
            .unwrap_or(i32::MAX)
            .saturating_add(1)
    };
    Rect::new(
        Point::new(a.row.min(b.row), a.col.min(b.col)),
        Size::new(extent(a.col, b.col), extent(a.row, b.row)),
    )
}

/// A unit step along one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn unit(self) -> Offset {
        match self {
            Self::Up => Offset::new(-1, 0),
            Self::Down => Offset::new(1, 0),
            Self::Left => Offset::new(0, -1),
            Self::Right => Offset::new(0, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    Box(BoxShape),
    Line(Connector),
    Arrow(Connector),
}

/// A shape in the document: a stable id plus its tagged payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ShapeKind {
        &mut self.kind
    }

    pub fn shape_type(&self) -> ShapeType {
        match self.kind {
            ShapeKind::Box(_) => ShapeType::Box,
            ShapeKind::Line(_) => ShapeType::Line,
            ShapeKind::Arrow(_) => ShapeType::Arrow,
        }
    }

    pub fn as_box(&self) -> Option<&BoxShape> {
        match &self.kind {
            ShapeKind::Box(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_box_mut(&mut self) -> Option<&mut BoxShape> {
        match &mut self.kind {
            ShapeKind::Box(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match &self.kind {
            ShapeKind::Line(connector) | ShapeKind::Arrow(connector) => Some(connector),
            ShapeKind::Box(_) => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match &mut self.kind {
            ShapeKind::Line(connector) | ShapeKind::Arrow(connector) => Some(connector),
            ShapeKind::Box(_) => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Box(shape) => shape.rect(),
            ShapeKind::Line(connector) | ShapeKind::Arrow(connector) => connector.bounds(),
        }
    }

    /// Whether `point` lands on a cell this shape occupies.
    pub fn hit_test(&self, point: Point) -> bool {
        match &self.kind {
            ShapeKind::Box(shape) => shape.rect().contains(point),
            ShapeKind::Line(connector) | ShapeKind::Arrow(connector) => {
                connector.covers(point)
            }
        }
    }
}
