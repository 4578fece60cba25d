// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Shape mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_one(
    document: &mut Document,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<Option<TextFit>, ApplyError> {
    match op {
        Op::CreateBox { at, size } => {
            let id = document.allocate_id(ShapeType::Box)?;
            document.insert(Shape::new(
                id.clone(),
                ShapeKind::Box(BoxShape::new(*at, *size)),
            ))?;
            delta.record_added(id);
            Ok(None)
        }
        Op::CreateLine { start, length } => {
            create_connector(document, ShapeType::Line, *start, *length, delta)?;
            Ok(None)
        }
        Op::CreateArrow { start, length } => {
            create_connector(document, ShapeType::Arrow, *start, *length, delta)?;
            Ok(None)
        }
        Op::Move { id, offset } => {
            let shape = find_mut(document, id)?;
            match shape.kind_mut() {
                ShapeKind::Box(shape) => {
                    shape.translate(*offset);
                    for connector_id in attach::on_box_moved(document, id, *offset) {
                        delta.record_updated(connector_id);
                    }
                }
                ShapeKind::Line(connector) | ShapeKind::Arrow(connector) => {
                    connector.translate(*offset);
                    attach::reattach_connector(document, id);
                }
            }
            delta.record_updated(id.clone());
            Ok(None)
        }
        Op::Resize {
            id,
            d_width,
            d_height,
        } => {
            let shape = find_box_mut(document, id)?;
            let old_size = shape.size();
            shape.resize(*d_width, *d_height);
            for connector_id in attach::on_box_resized(document, id, old_size) {
                delta.record_updated(connector_id);
            }
            delta.record_updated(id.clone());
            Ok(None)
        }
        Op::ToggleOrientation { id } => {
            let moved = find_connector_mut(document, id)?.toggle_orientation();
            if moved {
                attach::reattach_end(document, id);
            }
            delta.record_updated(id.clone());
            Ok(None)
        }
        Op::ToggleBorder { id } => {
            find_box_mut(document, id)?.toggle_border();
            delta.record_updated(id.clone());
            Ok(None)
        }
        Op::SetText { id, text } => {
            let fit = find_box_mut(document, id)?.set_text(text);
            delta.record_updated(id.clone());
            Ok(Some(fit))
        }
        Op::Delete { id } => {
            let removed = document
                .remove(id)
                .ok_or_else(|| ApplyError::NotFound { id: id.clone() })?;
            if removed.as_box().is_some() {
                for connector_id in attach::detach_all(document, id) {
                    delta.record_updated(connector_id);
                }
            }
            delta.record_removed(id.clone());
            Ok(None)
        }
    }
}

fn create_connector(
    document: &mut Document,
    shape_type: ShapeType,
    start: Point,
    length: i32,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let id = document.allocate_id(shape_type)?;
    let connector = Connector::horizontal(start, length);
    let kind = match shape_type {
        ShapeType::Arrow => ShapeKind::Arrow(connector),
        _ => ShapeKind::Line(connector),
    };
    document.insert(Shape::new(id.clone(), kind))?;
    attach::reattach_connector(document, &id);
    delta.record_added(id);
    Ok(())
}

fn find_mut<'a>(document: &'a mut Document, id: &ShapeId) -> Result<&'a mut Shape, ApplyError> {
    document
        .get_mut(id)
        .ok_or_else(|| ApplyError::NotFound { id: id.clone() })
}

fn find_box_mut<'a>(
    document: &'a mut Document,
    id: &ShapeId,
) -> Result<&'a mut BoxShape, ApplyError> {
    let shape = find_mut(document, id)?;
    let found = shape.shape_type();
    shape.as_box_mut().ok_or_else(|| ApplyError::NotABox {
        id: id.clone(),
        found,
    })
}

fn find_connector_mut<'a>(
    document: &'a mut Document,
    id: &ShapeId,
) -> Result<&'a mut Connector, ApplyError> {
    find_mut(document, id)?
        .as_connector_mut()
        .ok_or_else(|| ApplyError::NotAConnector { id: id.clone() })
}
