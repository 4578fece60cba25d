// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Import of the flat object-list format.
//!
//! Coordinates there are `x` (column) / `y` (row); extents are inclusive and may be negative,
//! and connectors carry no attachment records, so attachments are rebuilt by proximity.

use serde::Deserialize;
use serde_json::Value;

use super::{syntax_error, DecodeError, MalformedInput};
use crate::attach;
use crate::model::geom::COORD_LIMIT;
use crate::model::{
    BorderStyle, BoxShape, Connector, Document, DocumentError, Endpoint, IdError, Orientation,
    Point, Shape, ShapeKind, ShapeType, Size,
};

const LEGACY_HORIZONTAL: u8 = 1;
const LEGACY_VERTICAL: u8 = 2;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum LegacyObjectJson {
    Box(LegacyBoxJson),
    Line(LegacyLineJson),
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LegacyPointJson {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LegacySizeJson {
    w: i32,
    h: i32,
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyBoxJson {
    position: LegacyPointJson,
    size: LegacySizeJson,
    #[serde(default)]
    text: String,
    #[serde(default = "default_show_border")]
    show_border: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyLineJson {
    position: LegacyPointJson,
    size: LegacySizeJson,
    #[serde(default = "default_orientation")]
    orientation: u8,
    #[serde(default)]
    is_arrow: bool,
}

fn default_show_border() -> bool {
    true
}

fn default_orientation() -> u8 {
    LEGACY_HORIZONTAL
}

pub(super) fn decode(value: Value) -> Result<Document, DecodeError> {
    let objects: Vec<LegacyObjectJson> = serde_json::from_value(value).map_err(syntax_error)?;

    let mut document = Document::new();
    let mut connectors = Vec::new();
    for (index, object) in objects.into_iter().enumerate() {
        let (shape_type, kind) = match object {
            LegacyObjectJson::Box(box_json) => (ShapeType::Box, legacy_box(index, box_json)?),
            LegacyObjectJson::Line(line_json) => {
                let shape_type = if line_json.is_arrow {
                    ShapeType::Arrow
                } else {
                    ShapeType::Line
                };
                (shape_type, legacy_line(index, line_json)?)
            }
        };
        let id = document
            .allocate_id(shape_type)
            .map_err(|err| document_error(index, err))?;
        if shape_type != ShapeType::Box {
            connectors.push(id.clone());
        }
        document
            .insert(Shape::new(id, kind))
            .map_err(|err| document_error(index, err))?;
    }

    for id in &connectors {
        attach::reattach_connector(&mut document, id);
    }
    Ok(document)
}

fn shape_label(index: usize) -> String {
    format!("[{index}]")
}

fn document_error(index: usize, err: DocumentError) -> MalformedInput {
    match err {
        DocumentError::DuplicateId { id } => MalformedInput::DuplicateId {
            id: id.into_string(),
        },
        DocumentError::IdsExhausted => MalformedInput::InvalidId {
            field: shape_label(index),
            value: String::new(),
            source: IdError::CounterExhausted,
        },
    }
}

fn out_of_range(index: usize) -> MalformedInput {
    MalformedInput::InvalidGeometry {
        shape: shape_label(index),
        reason: "shape lies outside the supported coordinate range",
    }
}

/// Normalizes one inclusive, possibly negative extent to `(origin, cell_count)`.
fn span(index: usize, origin: i32, extent: i32) -> Result<(i32, i32), MalformedInput> {
    let origin = i64::from(origin) + i64::from(extent.min(0));
    let cells = i64::from(extent).abs() + 1;
    let (Ok(origin), Ok(cells)) = (i32::try_from(origin), i32::try_from(cells)) else {
        return Err(out_of_range(index));
    };
    let last = i64::from(origin) + i64::from(cells) - 1;
    let range = i64::from(-COORD_LIMIT)..=i64::from(COORD_LIMIT);
    if !range.contains(&i64::from(origin)) || !range.contains(&last) {
        return Err(out_of_range(index));
    }
    Ok((origin, cells))
}

fn legacy_box(index: usize, box_json: LegacyBoxJson) -> Result<ShapeKind, MalformedInput> {
    let (col, width) = span(index, box_json.position.x, box_json.size.w)?;
    let (row, height) = span(index, box_json.position.y, box_json.size.h)?;

    let mut lines: Vec<String> = box_json
        .text
        .split('\n')
        .map(|line| line.trim_end().to_owned())
        .collect();
    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    let mut box_shape =
        BoxShape::new(Point::new(row, col), Size::new(width, height)).with_text_lines(lines);
    if !box_json.show_border {
        box_shape.set_border(BorderStyle::Hidden);
    }
    if !box_shape.rect().in_coord_range() {
        return Err(out_of_range(index));
    }
    Ok(ShapeKind::Box(box_shape))
}

fn legacy_line(index: usize, line_json: LegacyLineJson) -> Result<ShapeKind, MalformedInput> {
    let orientation = match line_json.orientation {
        LEGACY_HORIZONTAL => Orientation::Horizontal,
        LEGACY_VERTICAL => Orientation::Vertical,
        _ => {
            return Err(MalformedInput::InvalidGeometry {
                shape: shape_label(index),
                reason: "orientation must be 1 (horizontal) or 2 (vertical)",
            })
        }
    };

    let start = Point::new(line_json.position.y, line_json.position.x);
    let end_row = line_json.position.y.checked_add(line_json.size.h);
    let end_col = line_json.position.x.checked_add(line_json.size.w);
    let (Some(end_row), Some(end_col)) = (end_row, end_col) else {
        return Err(out_of_range(index));
    };

    let connector = Connector::new(
        Endpoint::free(start),
        Endpoint::free(Point::new(end_row, end_col)),
        orientation,
    );
    if !connector.bounds().in_coord_range() {
        return Err(out_of_range(index));
    }
    Ok(if line_json.is_arrow {
        ShapeKind::Arrow(connector)
    } else {
        ShapeKind::Line(connector)
    })
}
