// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connector endpoint attachment tracking.
//!
//! Attachments are weak: an endpoint stores the id of a box and an offset from its top-left
//! corner. The offset always names a border cell of that box. The endpoint's `point` is the
//! authoritative rendered position; the tracker decides when box edits drag it along. An
//! endpoint is in sync while `point` equals the box's top-left plus the offset.

use tracing::debug;

use crate::model::{
    nearest_border_point, Attachment, Document, Endpoint, Offset, Point, Rect, ShapeId, Size,
};

/// The topmost box whose border passes through `point`.
pub fn box_on_border_at(document: &Document, point: Point) -> Option<&ShapeId> {
    document
        .shapes()
        .iter()
        .rev()
        .find(|shape| {
            shape
                .as_box()
                .is_some_and(|shape| shape.rect().is_on_border(point))
        })
        .map(|shape| shape.id())
}

/// The attachment an endpoint at `point` would get, if any.
pub fn attach_by_proximity(document: &Document, point: Point) -> Option<Attachment> {
    let box_id = box_on_border_at(document, point)?;
    let top_left = document.get(box_id)?.as_box()?.top_left();
    Some(Attachment {
        box_id: box_id.clone(),
        offset: point - top_left,
    })
}

/// Re-runs proximity attachment for both endpoints of a connector.
///
/// Returns `false` if `connector_id` does not name a connector.
pub fn reattach_connector(document: &mut Document, connector_id: &ShapeId) -> bool {
    reattach(document, connector_id, [true, true])
}

/// Re-runs proximity attachment for the end point only.
pub fn reattach_end(document: &mut Document, connector_id: &ShapeId) -> bool {
    reattach(document, connector_id, [false, true])
}

fn reattach(document: &mut Document, connector_id: &ShapeId, which: [bool; 2]) -> bool {
    let Some(connector) = document.get(connector_id).and_then(|s| s.as_connector()) else {
        return false;
    };
    let attachments = connector
        .endpoints()
        .map(|endpoint| attach_by_proximity(document, endpoint.point));

    let Some(connector) = document
        .get_mut(connector_id)
        .and_then(|shape| shape.as_connector_mut())
    else {
        return false;
    };
    let endpoints = connector.endpoints_mut().into_iter().zip(attachments);
    for ((endpoint, attachment), selected) in endpoints.zip(which) {
        if selected {
            endpoint.attachment = attachment;
        }
    }
    true
}

/// Applies a box move of `delta` to the endpoints attached to it.
///
/// With sticky mode off the attachment records are left untouched and nothing moves. With
/// sticky mode on every attached endpoint shifts by the same delta and keeps its offset.
/// Returns the connectors that changed.
pub fn on_box_moved(document: &mut Document, box_id: &ShapeId, delta: Offset) -> Vec<ShapeId> {
    if !document.sticky() || delta.is_zero() {
        return Vec::new();
    }

    let mut moved = Vec::new();
    for shape in document.shapes_mut() {
        let id = shape.id().clone();
        let Some(connector) = shape.as_connector_mut() else {
            continue;
        };
        let mut touched = false;
        for endpoint in connector.endpoints_mut() {
            if endpoint.is_attached_to(box_id) {
                endpoint.point += delta;
                touched = true;
            }
        }
        if touched {
            moved.push(id);
        }
    }

    debug!(box_id = %box_id, ?delta, connectors = moved.len(), "sticky move");
    moved
}

/// Re-resolves endpoints after a box changed size from `old_size`.
///
/// Every attached offset is moved onto the new border: one on the right or bottom edge follows
/// that edge, others are clamped. Points only move in sticky mode, and only for endpoints that
/// were in sync. Returns the connectors whose offset or point changed.
pub fn on_box_resized(document: &mut Document, box_id: &ShapeId, old_size: Size) -> Vec<ShapeId> {
    let Some(rect) = document.get(box_id).and_then(|s| s.as_box()).map(|b| b.rect()) else {
        return Vec::new();
    };
    let sticky = document.sticky();

    let mut moved = Vec::new();
    for shape in document.shapes_mut() {
        let id = shape.id().clone();
        let Some(connector) = shape.as_connector_mut() else {
            continue;
        };
        let mut touched = false;
        for endpoint in connector.endpoints_mut() {
            if follow_resize(endpoint, box_id, rect, old_size, sticky) {
                touched = true;
            }
        }
        if touched {
            moved.push(id);
        }
    }
    moved
}

fn follow_resize(
    endpoint: &mut Endpoint,
    box_id: &ShapeId,
    rect: Rect,
    old_size: Size,
    sticky: bool,
) -> bool {
    let Some(attachment) = endpoint.attachment.as_mut() else {
        return false;
    };
    if &attachment.box_id != box_id {
        return false;
    }
    let in_sync = endpoint.point == rect.top_left + attachment.offset;

    let old = attachment.offset;
    let row = if old.row == old_size.height - 1 {
        rect.size.height - 1
    } else {
        old.row.min(rect.size.height - 1)
    };
    let col = if old.col == old_size.width - 1 {
        rect.size.width - 1
    } else {
        old.col.min(rect.size.width - 1)
    };
    let Some(anchor) = nearest_border_point(rect, rect.top_left + Offset::new(row, col)) else {
        return false;
    };

    let offset = anchor - rect.top_left;
    let mut changed = offset != attachment.offset;
    attachment.offset = offset;
    if sticky && in_sync && endpoint.point != anchor {
        endpoint.point = anchor;
        changed = true;
    }
    changed
}

/// Frees every endpoint attached to `box_id`, leaving it at its last point.
pub fn detach_all(document: &mut Document, box_id: &ShapeId) -> Vec<ShapeId> {
    let mut detached = Vec::new();
    for shape in document.shapes_mut() {
        let id = shape.id().clone();
        let Some(connector) = shape.as_connector_mut() else {
            continue;
        };
        let mut touched = false;
        for endpoint in connector.endpoints_mut() {
            if endpoint.is_attached_to(box_id) {
                endpoint.attachment = None;
                touched = true;
            }
        }
        if touched {
            detached.push(id);
        }
    }
    detached
}

/// Where the anchor of `attachment` currently lies: the box's top-left plus the offset,
/// projected onto the nearest border cell. `None` if the box is gone.
pub fn anchor_point(document: &Document, attachment: &Attachment) -> Option<Point> {
    let rect = document.get(&attachment.box_id)?.as_box()?.rect();
    nearest_border_point(rect, rect.top_left + attachment.offset)
}

/// The offset of the border cell of `rect` closest to `top_left + offset`.
pub fn clamp_offset(rect: Rect, offset: Offset) -> Offset {
    nearest_border_point(rect, rect.top_left + offset).map_or(offset, |anchor| anchor - rect.top_left)
}

#[cfg(test)]
mod tests {
    use super::{
        anchor_point, attach_by_proximity, clamp_offset, detach_all, on_box_moved,
        on_box_resized, reattach_connector,
    };
    use crate::model::{
        Attachment, BoxShape, Connector, Document, Offset, Point, Rect, Shape, ShapeId, ShapeKind,
        Size,
    };
    use rstest::rstest;

    fn sid(value: &str) -> ShapeId {
        ShapeId::new(value).expect("shape id")
    }

    fn doc_with_box_and_arrow() -> Document {
        let mut doc = Document::new();
        doc.insert(Shape::new(
            sid("box-1"),
            ShapeKind::Box(BoxShape::new(Point::new(0, 0), Size::new(5, 3))),
        ))
        .expect("box");
        doc.insert(Shape::new(
            sid("arrow-2"),
            ShapeKind::Arrow(Connector::horizontal(Point::new(1, 4), 6)),
        ))
        .expect("arrow");
        assert!(reattach_connector(&mut doc, &sid("arrow-2")));
        doc
    }

    fn arrow(doc: &Document) -> &Connector {
        doc.get(&sid("arrow-2"))
            .and_then(Shape::as_connector)
            .expect("arrow")
    }

    fn move_box(doc: &mut Document, delta: Offset) {
        doc.get_mut(&sid("box-1"))
            .and_then(Shape::as_box_mut)
            .expect("box")
            .translate(delta);
        on_box_moved(doc, &sid("box-1"), delta);
    }

    #[test]
    fn proximity_attaches_to_border_cells_only() {
        let doc = doc_with_box_and_arrow();
        assert_eq!(
            attach_by_proximity(&doc, Point::new(1, 4)),
            Some(Attachment {
                box_id: sid("box-1"),
                offset: Offset::new(1, 4),
            })
        );
        assert_eq!(attach_by_proximity(&doc, Point::new(1, 2)), None);
        assert_eq!(attach_by_proximity(&doc, Point::new(1, 5)), None);
    }

    #[test]
    fn proximity_prefers_topmost_box() {
        let mut doc = doc_with_box_and_arrow();
        doc.insert(Shape::new(
            sid("box-3"),
            ShapeKind::Box(BoxShape::new(Point::new(0, 4), Size::new(3, 3))),
        ))
        .expect("box");
        let attachment = attach_by_proximity(&doc, Point::new(1, 4)).expect("attached");
        assert_eq!(attachment.box_id, sid("box-3"));
        assert_eq!(attachment.offset, Offset::new(1, 0));
    }

    #[test]
    fn reattach_sets_both_endpoints() {
        let doc = doc_with_box_and_arrow();
        let connector = arrow(&doc);
        assert!(connector.start().is_attached_to(&sid("box-1")));
        assert!(connector.end().attachment.is_none());
    }

    #[test]
    fn sticky_off_move_keeps_endpoints_and_records() {
        let mut doc = doc_with_box_and_arrow();
        move_box(&mut doc, Offset::new(0, 3));

        let connector = arrow(&doc);
        assert_eq!(connector.start().point, Point::new(1, 4));
        assert!(connector.start().is_attached_to(&sid("box-1")));
    }

    #[test]
    fn sticky_on_move_drags_endpoint_by_delta() {
        let mut doc = doc_with_box_and_arrow();
        move_box(&mut doc, Offset::new(0, 3));
        doc.set_sticky(true);
        move_box(&mut doc, Offset::new(0, 3));

        let connector = arrow(&doc);
        assert_eq!(connector.start().point, Point::new(1, 7));
        assert_eq!(
            connector.start().attachment.as_ref().map(|a| a.offset),
            Some(Offset::new(1, 4))
        );
        assert_eq!(connector.end().point, Point::new(1, 9));
    }

    #[test]
    fn sticky_resize_keeps_right_edge_endpoints_on_the_right_edge() {
        let mut doc = doc_with_box_and_arrow();
        doc.set_sticky(true);
        let old_size = doc
            .get_mut(&sid("box-1"))
            .and_then(Shape::as_box_mut)
            .map(|shape| {
                let old = shape.size();
                shape.resize(2, 2);
                old
            })
            .expect("box");

        let moved = on_box_resized(&mut doc, &sid("box-1"), old_size);
        assert_eq!(moved, vec![sid("arrow-2")]);
        assert_eq!(arrow(&doc).start().point, Point::new(1, 6));

        let rect = doc.get(&sid("box-1")).and_then(Shape::as_box).expect("box").rect();
        assert!(rect.is_on_border(arrow(&doc).start().point));
    }

    fn resize_box(doc: &mut Document, d_width: i32, d_height: i32) -> Vec<ShapeId> {
        let old_size = doc
            .get_mut(&sid("box-1"))
            .and_then(Shape::as_box_mut)
            .map(|shape| {
                let old = shape.size();
                shape.resize(d_width, d_height);
                old
            })
            .expect("box");
        on_box_resized(doc, &sid("box-1"), old_size)
    }

    fn start_offset_is_on_border(doc: &Document) -> bool {
        let rect = doc.get(&sid("box-1")).and_then(Shape::as_box).expect("box").rect();
        arrow(doc)
            .start()
            .attachment
            .as_ref()
            .is_some_and(|a| rect.is_on_border(rect.top_left + a.offset))
    }

    #[test]
    fn sticky_resize_leaves_out_of_sync_points_but_follows_the_offset() {
        let mut doc = doc_with_box_and_arrow();
        move_box(&mut doc, Offset::new(0, 3));
        doc.set_sticky(true);

        assert_eq!(resize_box(&mut doc, 1, 0), vec![sid("arrow-2")]);
        let start = arrow(&doc).start();
        assert_eq!(start.point, Point::new(1, 4));
        assert_eq!(start.attachment.as_ref().map(|a| a.offset), Some(Offset::new(1, 5)));
    }

    #[test]
    fn non_sticky_shrink_clamps_the_offset_onto_the_border() {
        let mut doc = doc_with_box_and_arrow();

        assert_eq!(resize_box(&mut doc, -2, 0), vec![sid("arrow-2")]);
        let start = arrow(&doc).start();
        assert_eq!(start.point, Point::new(1, 4));
        assert_eq!(start.attachment.as_ref().map(|a| a.offset), Some(Offset::new(1, 2)));
        assert!(start_offset_is_on_border(&doc));

        doc.set_sticky(true);
        move_box(&mut doc, Offset::new(0, 3));
        assert_eq!(arrow(&doc).start().point, Point::new(1, 7));
        assert!(start_offset_is_on_border(&doc));
    }

    #[test]
    fn resizing_an_unrelated_box_touches_nothing() {
        let mut doc = doc_with_box_and_arrow();
        doc.insert(Shape::new(
            sid("box-3"),
            ShapeKind::Box(BoxShape::new(Point::new(6, 0), Size::new(4, 4))),
        ))
        .expect("box");
        assert!(on_box_resized(&mut doc, &sid("box-3"), Size::new(3, 3)).is_empty());
        assert_eq!(
            arrow(&doc).start().attachment.as_ref().map(|a| a.offset),
            Some(Offset::new(1, 4))
        );
    }

    #[test]
    fn detach_all_frees_endpoints_in_place() {
        let mut doc = doc_with_box_and_arrow();
        assert_eq!(detach_all(&mut doc, &sid("box-1")), vec![sid("arrow-2")]);

        let connector = arrow(&doc);
        assert!(connector.start().attachment.is_none());
        assert_eq!(connector.start().point, Point::new(1, 4));
    }

    #[rstest]
    #[case::already_on_border(Offset::new(0, 2), Offset::new(0, 2))]
    #[case::interior(Offset::new(1, 1), Offset::new(0, 1))]
    #[case::far_outside(Offset::new(8, 30), Offset::new(2, 4))]
    #[case::above_left(Offset::new(-5, -5), Offset::new(0, 0))]
    fn clamp_offset_lands_on_the_border(#[case] offset: Offset, #[case] expected: Offset) {
        let rect = Rect::new(Point::new(10, 20), Size::new(5, 3));
        let clamped = clamp_offset(rect, offset);
        assert_eq!(clamped, expected);
        assert!(rect.is_on_border(rect.top_left + clamped));
    }

    #[test]
    fn anchor_point_projects_onto_border() {
        let doc = doc_with_box_and_arrow();
        let on_border = Attachment {
            box_id: sid("box-1"),
            offset: Offset::new(1, 4),
        };
        assert_eq!(anchor_point(&doc, &on_border), Some(Point::new(1, 4)));

        let outside = Attachment {
            box_id: sid("box-1"),
            offset: Offset::new(1, 9),
        };
        assert_eq!(anchor_point(&doc, &outside), Some(Point::new(1, 4)));

        let missing = Attachment {
            box_id: sid("box-99"),
            offset: Offset::ZERO,
        };
        assert_eq!(anchor_point(&doc, &missing), None);
    }
}
