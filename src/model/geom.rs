// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Character-grid geometry.
//!
//! Coordinates are signed `(row, col)` cell indices so shapes can be dragged partly off the
//! visible area; clipping happens at rasterization time.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Largest absolute row or column a stored shape may occupy.
pub const COORD_LIMIT: i32 = 4096;

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn shifted(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row.saturating_add(d_row),
            col: self.col.saturating_add(d_col),
        }
    }
}

impl Point {
    /// Whether both coordinates lie within `-COORD_LIMIT..=COORD_LIMIT`.
    pub fn in_coord_range(self) -> bool {
        let range = -COORD_LIMIT..=COORD_LIMIT;
        range.contains(&self.row) && range.contains(&self.col)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The difference between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub row: i32,
    pub col: i32,
}

impl Offset {
    pub const ZERO: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Point {
        self.shifted(rhs.row, rhs.col)
    }
}

impl AddAssign<Offset> for Point {
    fn add_assign(&mut self, rhs: Offset) {
        *self = *self + rhs;
    }
}

impl Sub<Point> for Point {
    type Output = Offset;

    fn sub(self, rhs: Point) -> Offset {
        Offset {
            row: self.row.saturating_sub(rhs.row),
            col: self.col.saturating_sub(rhs.col),
        }
    }
}

/// Width/height in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle of cells.
///
/// A rect of width `w` covers columns `left..=left + w - 1`; a rect with a non-positive
/// dimension is empty and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub top_left: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(top_left: Point, size: Size) -> Self {
        Self { top_left, size }
    }

    pub fn top(&self) -> i32 {
        self.top_left.row
    }

    pub fn left(&self) -> i32 {
        self.top_left.col
    }

    /// Last covered row (inclusive).
    pub fn bottom(&self) -> i32 {
        self.top_left.row.saturating_add(self.size.height.saturating_sub(1))
    }

    /// Last covered column (inclusive).
    pub fn right(&self) -> i32 {
        self.top_left.col.saturating_add(self.size.width.saturating_sub(1))
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.bottom(), self.right())
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    /// Whether every covered cell lies within [`COORD_LIMIT`]. Empty rects cover nothing.
    pub fn in_coord_range(&self) -> bool {
        self.is_empty() || (self.top_left.in_coord_range() && self.bottom_right().in_coord_range())
    }

    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && (self.top()..=self.bottom()).contains(&point.row)
            && (self.left()..=self.right()).contains(&point.col)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn is_on_border(&self, point: Point) -> bool {
        self.contains(point)
            && (point.row == self.top()
                || point.row == self.bottom()
                || point.col == self.left()
                || point.col == self.right())
    }

    /// The rect shrunk by one cell on every side, if anything is left.
    pub fn interior(&self) -> Option<Rect> {
        let inner = Rect::new(
            self.top_left.shifted(1, 1),
            Size::new(self.size.width.saturating_sub(2), self.size.height.saturating_sub(2)),
        );
        (!inner.is_empty()).then_some(inner)
    }

    pub fn translated(&self, offset: Offset) -> Rect {
        Rect::new(self.top_left + offset, self.size)
    }

    /// Perimeter cells clockwise from the top-left corner, each cell exactly once.
    pub fn border_points(&self) -> Vec<Point> {
        if self.is_empty() {
            return Vec::new();
        }

        let (top, left, bottom, right) = (self.top(), self.left(), self.bottom(), self.right());
        let perimeter = 2 * (i64::from(self.size.width) + i64::from(self.size.height));
        let mut points = Vec::with_capacity(usize::try_from(perimeter).unwrap_or(0));

        for col in left..=right {
            points.push(Point::new(top, col));
        }
        for row in (top + 1)..=bottom {
            points.push(Point::new(row, right));
        }
        if bottom > top {
            for col in (left..right).rev() {
                points.push(Point::new(bottom, col));
            }
        }
        if right > left {
            for row in ((top + 1)..bottom).rev() {
                points.push(Point::new(row, left));
            }
        }

        points
    }
}

/// Clamps `point` into `bounds`. Empty bounds leave the point untouched.
pub fn clamp(point: Point, bounds: Rect) -> Point {
    if bounds.is_empty() {
        return point;
    }
    Point::new(
        point.row.clamp(bounds.top(), bounds.bottom()),
        point.col.clamp(bounds.left(), bounds.right()),
    )
}

/// The border cell of `rect` closest to `point`.
///
/// Points outside are first clamped into the rect; interior points are projected onto the
/// nearest edge (ties prefer top, bottom, left, right in that order).
pub fn nearest_border_point(rect: Rect, point: Point) -> Option<Point> {
    if rect.is_empty() {
        return None;
    }

    let clamped = clamp(point, rect);
    if rect.is_on_border(clamped) {
        return Some(clamped);
    }

    let candidates = [
        (clamped.row.abs_diff(rect.top()), Point::new(rect.top(), clamped.col)),
        (rect.bottom().abs_diff(clamped.row), Point::new(rect.bottom(), clamped.col)),
        (clamped.col.abs_diff(rect.left()), Point::new(clamped.row, rect.left())),
        (rect.right().abs_diff(clamped.col), Point::new(clamped.row, rect.right())),
    ];

    candidates
        .iter()
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, point)| *point)
}
