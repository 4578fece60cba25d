// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::document::Document;
use super::geom::{Point, Size};
use super::ids::ShapeId;
use crate::ops::{apply_ops, Op};

pub(crate) fn sid(value: &str) -> ShapeId {
    ShapeId::new(value).expect("shape id")
}

/// Two boxes joined by an arrow attached at both ends:
///
/// ```text
/// ┌───┐       ┌───┐
/// │hi ────────▶   │
/// └───┘       └───┘
/// ```
///
/// Ids: `box-1`, `box-2`, `arrow-3`.
pub(crate) fn boxes_and_arrow() -> Document {
    let mut document = Document::new();
    apply_ops(
        &mut document,
        &[
            Op::CreateBox {
                at: Point::new(0, 0),
                size: Size::new(5, 3),
            },
            Op::SetText {
                id: sid("box-1"),
                text: "hi".to_owned(),
            },
            Op::CreateBox {
                at: Point::new(0, 12),
                size: Size::new(5, 3),
            },
            Op::CreateArrow {
                start: Point::new(1, 4),
                length: 9,
            },
        ],
    )
    .expect("fixture ops");
    document
}
