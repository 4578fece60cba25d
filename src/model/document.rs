// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::geom::{Point, Rect, Size};
use super::ids::ShapeId;
use super::shape::{Shape, ShapeType};

/// The diagram being edited: shapes in z-order plus the session state around them.
///
/// Later shapes draw on top of earlier ones. `selection` always names an existing shape or
/// is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    shapes: Vec<Shape>,
    selection: Option<ShapeId>,
    cursor: Point,
    sticky: bool,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            selection: None,
            cursor: Point::default(),
            sticky: false,
            next_id: 1,
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub(crate) fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of `id` in z-order.
    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|shape| shape.id() == id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }

    /// Returns a fresh id for a new shape of `shape_type`.
    ///
    /// Ids are never handed out twice; once the counter reaches `u64::MAX` allocation fails.
    pub fn allocate_id(&mut self, shape_type: ShapeType) -> Result<ShapeId, DocumentError> {
        loop {
            let counter = self.next_id;
            self.next_id = counter
                .checked_add(1)
                .ok_or(DocumentError::IdsExhausted)?;
            let id = ShapeId::generated(shape_type.id_prefix(), counter);
            if !self.contains(&id) {
                return Ok(id);
            }
        }
    }

    /// Appends `shape` on top of the z-order.
    pub fn insert(&mut self, shape: Shape) -> Result<(), DocumentError> {
        if self.contains(shape.id()) {
            return Err(DocumentError::DuplicateId {
                id: shape.id().clone(),
            });
        }
        if let Some(suffix) = shape.id().numeric_suffix() {
            let after = suffix.checked_add(1).ok_or(DocumentError::IdsExhausted)?;
            self.next_id = self.next_id.max(after);
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// Removes a shape, clearing the selection if it pointed at it.
    ///
    /// Endpoints attached to a removed box are left alone; see [`crate::attach::detach_all`].
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        Some(self.shapes.remove(index))
    }

    /// The last-drawn shape occupying `point`.
    pub fn topmost_at(&self, point: Point) -> Option<&Shape> {
        self.shapes.iter().rev().find(|shape| shape.hit_test(point))
    }

    /// The rect from the origin to the furthest cell any shape covers.
    pub fn extent(&self) -> Rect {
        let (bottom, right) = self
            .shapes
            .iter()
            .map(|shape| shape.bounds().bottom_right())
            .fold((-1, -1), |(bottom, right), corner| {
                (bottom.max(corner.row), right.max(corner.col))
            });
        Rect::new(Point::new(0, 0), Size::new(right + 1, bottom + 1))
    }

    pub fn selection(&self) -> Option<&ShapeId> {
        self.selection.as_ref()
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.as_ref().and_then(|id| self.get(id))
    }

    /// Selects `id`, or clears the selection with `None`. Unknown ids are refused.
    pub fn select(&mut self, id: Option<ShapeId>) -> bool {
        match id {
            Some(id) if !self.contains(&id) => false,
            id => {
                self.selection = id;
                true
            }
        }
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    pub fn sticky(&self) -> bool {
        self.sticky
    }

    pub fn set_sticky(&mut self, sticky: bool) {
        self.sticky = sticky;
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Raises the id counter; it never moves backwards.
    pub fn bump_next_id(&mut self, at_least: u64) {
        self.next_id = self.next_id.max(at_least);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    DuplicateId { id: ShapeId },
    IdsExhausted,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate shape id: {id}"),
            Self::IdsExhausted => f.write_str("no shape ids left"),
        }
    }
}

impl std::error::Error for DocumentError {}
