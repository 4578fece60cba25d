// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A [`Document`] holds boxes, lines and arrows in z-order on a signed character grid.

pub mod document;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod geom;
pub mod ids;
pub mod shape;

pub use document::{Document, DocumentError};
pub use geom::{clamp, nearest_border_point, Offset, Point, Rect, Size};
pub use ids::{Id, IdError, ShapeId};
pub use shape::{
    Attachment, BorderStyle, BoxShape, Connector, Direction, Endpoint, Orientation, Shape,
    ShapeKind, ShapeType, TextFit, MIN_BOX_HEIGHT, MIN_BOX_WIDTH,
};
