// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{syntax_error, DecodeError, EncodeError, MalformedInput};
use crate::attach::clamp_offset;
use crate::model::{
    Attachment, BorderStyle, BoxShape, Connector, Document, DocumentError, Endpoint, IdError,
    Offset, Orientation, Point, Shape, ShapeId, ShapeKind, Size, MIN_BOX_HEIGHT, MIN_BOX_WIDTH,
};

pub const FORMAT_NAME: &str = "boxline";
pub const FORMAT_VERSION: u64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentJson {
    format: String,
    version: u64,
    #[serde(default)]
    sticky: bool,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    shapes: Vec<ShapeJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeJson {
    Box(BoxJson),
    Line(ConnectorJson),
    Arrow(ConnectorJson),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoxJson {
    id: String,
    row: i32,
    col: i32,
    width: i32,
    height: i32,
    #[serde(default)]
    border: BorderJson,
    #[serde(default)]
    text: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConnectorJson {
    id: String,
    #[serde(default)]
    orientation: OrientationJson,
    start: EndpointJson,
    end: EndpointJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EndpointJson {
    row: i32,
    col: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attached_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<OffsetJson>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct OffsetJson {
    row: i32,
    col: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BorderJson {
    #[default]
    Visible,
    Hidden,
}

impl From<BorderStyle> for BorderJson {
    fn from(border: BorderStyle) -> Self {
        match border {
            BorderStyle::Visible => Self::Visible,
            BorderStyle::Hidden => Self::Hidden,
        }
    }
}

impl From<BorderJson> for BorderStyle {
    fn from(border: BorderJson) -> Self {
        match border {
            BorderJson::Visible => Self::Visible,
            BorderJson::Hidden => Self::Hidden,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OrientationJson {
    #[default]
    Horizontal,
    Vertical,
}

impl From<Orientation> for OrientationJson {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::Horizontal,
            Orientation::Vertical => Self::Vertical,
        }
    }
}

impl From<OrientationJson> for Orientation {
    fn from(orientation: OrientationJson) -> Self {
        match orientation {
            OrientationJson::Horizontal => Self::Horizontal,
            OrientationJson::Vertical => Self::Vertical,
        }
    }
}

pub(super) fn encode(document: &Document) -> Result<String, EncodeError> {
    let json = document_to_json(document);
    let mut text = serde_json::to_string_pretty(&json)?;
    text.push('\n');
    Ok(text)
}

pub(super) fn decode(value: Value) -> Result<Document, DecodeError> {
    check_header(&value)?;
    let json: DocumentJson = serde_json::from_value(value).map_err(syntax_error)?;
    document_from_json(json).map_err(DecodeError::from)
}

fn check_header(value: &Value) -> Result<(), MalformedInput> {
    match value.get("format") {
        Some(Value::String(format)) if format == FORMAT_NAME => {}
        Some(Value::String(format)) => {
            return Err(MalformedInput::UnsupportedFormat {
                found: format.clone(),
            })
        }
        Some(other) => {
            return Err(MalformedInput::UnsupportedFormat {
                found: other.to_string(),
            })
        }
        None => {
            return Err(MalformedInput::UnsupportedFormat {
                found: String::new(),
            })
        }
    }

    match value.get("version").and_then(Value::as_u64) {
        Some(found) if found != FORMAT_VERSION => Err(MalformedInput::UnsupportedVersion { found }),
        _ => Ok(()),
    }
}

fn document_to_json(document: &Document) -> DocumentJson {
    DocumentJson {
        format: FORMAT_NAME.to_owned(),
        version: FORMAT_VERSION,
        sticky: document.sticky(),
        next_id: document.next_id(),
        shapes: document.shapes().iter().map(shape_to_json).collect(),
    }
}

fn shape_to_json(shape: &Shape) -> ShapeJson {
    let id = shape.id().to_string();
    match shape.kind() {
        ShapeKind::Box(box_shape) => {
            let rect = box_shape.rect();
            ShapeJson::Box(BoxJson {
                id,
                row: rect.top(),
                col: rect.left(),
                width: rect.size.width,
                height: rect.size.height,
                border: box_shape.border().into(),
                text: box_shape.text().to_vec(),
            })
        }
        ShapeKind::Line(connector) => ShapeJson::Line(connector_to_json(id, connector)),
        ShapeKind::Arrow(connector) => ShapeJson::Arrow(connector_to_json(id, connector)),
    }
}

fn connector_to_json(id: String, connector: &Connector) -> ConnectorJson {
    ConnectorJson {
        id,
        orientation: connector.orientation().into(),
        start: endpoint_to_json(connector.start()),
        end: endpoint_to_json(connector.end()),
    }
}

fn endpoint_to_json(endpoint: &Endpoint) -> EndpointJson {
    EndpointJson {
        row: endpoint.point.row,
        col: endpoint.point.col,
        attached_to: endpoint.attached_box().map(ToString::to_string),
        offset: endpoint.attachment.as_ref().map(|attachment| OffsetJson {
            row: attachment.offset.row,
            col: attachment.offset.col,
        }),
    }
}

/// An endpoint whose attachment target has been parsed but not yet checked against the
/// document.
struct PendingAttachment {
    shape: ShapeId,
    end: EndSide,
    box_id: ShapeId,
    offset: Option<Offset>,
}

#[derive(Debug, Clone, Copy)]
enum EndSide {
    Start,
    End,
}

fn document_from_json(json: DocumentJson) -> Result<Document, MalformedInput> {
    let mut document = Document::new();
    let mut pending = Vec::<PendingAttachment>::new();

    for (index, shape_json) in json.shapes.into_iter().enumerate() {
        let shape = match shape_json {
            ShapeJson::Box(box_json) => box_from_json(index, box_json)?,
            ShapeJson::Line(connector_json) => {
                let (id, connector) = connector_from_json(index, connector_json, &mut pending)?;
                Shape::new(id, ShapeKind::Line(connector))
            }
            ShapeJson::Arrow(connector_json) => {
                let (id, connector) = connector_from_json(index, connector_json, &mut pending)?;
                Shape::new(id, ShapeKind::Arrow(connector))
            }
        };
        document.insert(shape).map_err(|err| match err {
            DocumentError::DuplicateId { id } => MalformedInput::DuplicateId {
                id: id.into_string(),
            },
            DocumentError::IdsExhausted => counter_exhausted(format!("shapes[{index}].id"), ""),
        })?;
    }

    for attachment in pending {
        resolve_attachment(&mut document, attachment)?;
    }

    if json.next_id == u64::MAX {
        return Err(counter_exhausted("next_id".to_owned(), &json.next_id.to_string()));
    }
    document.set_sticky(json.sticky);
    document.bump_next_id(json.next_id);
    Ok(document)
}

fn parse_shape_id(index: usize, value: String) -> Result<ShapeId, MalformedInput> {
    let field = format!("shapes[{index}].id");
    let id = ShapeId::new(value.clone()).map_err(|source| MalformedInput::InvalidId {
        field: field.clone(),
        value: value.clone(),
        source,
    })?;
    if id.numeric_suffix() == Some(u64::MAX) {
        return Err(counter_exhausted(field, &value));
    }
    Ok(id)
}

fn counter_exhausted(field: String, value: &str) -> MalformedInput {
    MalformedInput::InvalidId {
        field,
        value: value.to_owned(),
        source: IdError::CounterExhausted,
    }
}

fn box_from_json(index: usize, box_json: BoxJson) -> Result<Shape, MalformedInput> {
    let id = parse_shape_id(index, box_json.id)?;
    if box_json.width < MIN_BOX_WIDTH || box_json.height < MIN_BOX_HEIGHT {
        return Err(MalformedInput::BoxTooSmall {
            shape: id.into_string(),
            width: box_json.width,
            height: box_json.height,
        });
    }
    let lines = box_json
        .text
        .iter()
        .flat_map(|line| line.split('\n'))
        .map(ToOwned::to_owned)
        .collect();
    let mut box_shape = BoxShape::new(
        Point::new(box_json.row, box_json.col),
        Size::new(box_json.width, box_json.height),
    )
    .with_text_lines(lines);
    box_shape.set_border(box_json.border.into());

    let shape = Shape::new(id, ShapeKind::Box(box_shape));
    check_coord_range(&shape)?;
    Ok(shape)
}

fn check_coord_range(shape: &Shape) -> Result<(), MalformedInput> {
    if shape.bounds().in_coord_range() {
        return Ok(());
    }
    Err(out_of_range(shape.id().to_string()))
}

fn out_of_range(shape: String) -> MalformedInput {
    MalformedInput::InvalidGeometry {
        shape,
        reason: "shape lies outside the supported coordinate range",
    }
}

fn connector_from_json(
    index: usize,
    connector_json: ConnectorJson,
    pending: &mut Vec<PendingAttachment>,
) -> Result<(ShapeId, Connector), MalformedInput> {
    let id = parse_shape_id(index, connector_json.id)?;

    for (side, endpoint_json) in [
        (EndSide::Start, &connector_json.start),
        (EndSide::End, &connector_json.end),
    ] {
        let Some(target) = endpoint_json.attached_to.clone() else {
            continue;
        };
        let field = match side {
            EndSide::Start => format!("shapes[{index}].start.attached_to"),
            EndSide::End => format!("shapes[{index}].end.attached_to"),
        };
        let box_id = ShapeId::new(target.clone()).map_err(|source| MalformedInput::InvalidId {
            field,
            value: target,
            source,
        })?;
        pending.push(PendingAttachment {
            shape: id.clone(),
            end: side,
            box_id,
            offset: endpoint_json
                .offset
                .map(|offset| Offset::new(offset.row, offset.col)),
        });
    }

    let connector = Connector::new(
        Endpoint::free(Point::new(connector_json.start.row, connector_json.start.col)),
        Endpoint::free(Point::new(connector_json.end.row, connector_json.end.col)),
        connector_json.orientation.into(),
    );
    if !connector.bounds().in_coord_range() {
        return Err(out_of_range(id.into_string()));
    }
    Ok((id, connector))
}

fn resolve_attachment(
    document: &mut Document,
    pending: PendingAttachment,
) -> Result<(), MalformedInput> {
    let Some(target) = document.get(&pending.box_id) else {
        return Err(MalformedInput::DanglingAttachment {
            shape: pending.shape.into_string(),
            box_id: pending.box_id.into_string(),
        });
    };
    let Some(box_shape) = target.as_box() else {
        return Err(MalformedInput::AttachmentNotABox {
            shape: pending.shape.into_string(),
            target: pending.box_id.into_string(),
        });
    };
    let rect = box_shape.rect();

    let connector = document
        .get_mut(&pending.shape)
        .and_then(Shape::as_connector_mut)
        .ok_or_else(|| MalformedInput::InvalidGeometry {
            shape: pending.shape.to_string(),
            reason: "attachment recorded on a shape that is not a connector",
        })?;
    let endpoint = match pending.end {
        EndSide::Start => connector.start_mut(),
        EndSide::End => connector.end_mut(),
    };
    let requested = pending.offset.unwrap_or(endpoint.point - rect.top_left);
    endpoint.attachment = Some(Attachment {
        box_id: pending.box_id,
        offset: clamp_offset(rect, requested),
    });
    Ok(())
}
