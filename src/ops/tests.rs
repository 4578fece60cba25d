// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::geom::COORD_LIMIT;
use crate::model::{
    BorderStyle, Document, DocumentError, Offset, Orientation, Point, Shape, ShapeId, ShapeType,
    Size, TextFit,
};

use super::{apply_op, apply_ops, ApplyError, Op};

fn sid(value: &str) -> ShapeId {
    ShapeId::new(value).expect("shape id")
}

fn doc_with_box() -> Document {
    let mut doc = Document::new();
    apply_op(
        &mut doc,
        &Op::CreateBox {
            at: Point::new(0, 0),
            size: Size::new(5, 3),
        },
    )
    .expect("create box");
    doc
}

fn doc_with_box_and_arrow() -> Document {
    let mut doc = doc_with_box();
    apply_op(
        &mut doc,
        &Op::CreateArrow {
            start: Point::new(1, 4),
            length: 6,
        },
    )
    .expect("create arrow");
    doc
}

fn connector_points(doc: &Document, id: &str) -> (Point, Point) {
    let connector = doc
        .get(&sid(id))
        .and_then(Shape::as_connector)
        .expect("connector");
    (connector.start().point, connector.end().point)
}

#[test]
fn create_box_allocates_id_and_reports_added() {
    let mut doc = Document::new();
    let result = apply_op(
        &mut doc,
        &Op::CreateBox {
            at: Point::new(2, 3),
            size: Size::new(5, 3),
        },
    )
    .expect("apply");

    assert_eq!(result.applied, 1);
    assert_eq!(result.delta.added, vec![sid("box-1")]);
    assert!(result.delta.updated.is_empty());

    let shape = doc.get(&sid("box-1")).expect("box");
    assert_eq!(shape.shape_type(), ShapeType::Box);
    assert_eq!(shape.bounds().top_left, Point::new(2, 3));
}

#[test]
fn create_arrow_on_box_border_attaches_start() {
    let doc = doc_with_box_and_arrow();
    let connector = doc
        .get(&sid("arrow-2"))
        .and_then(Shape::as_connector)
        .expect("arrow");

    assert_eq!(connector.start().point, Point::new(1, 4));
    assert_eq!(connector.end().point, Point::new(1, 9));
    assert!(connector.start().is_attached_to(&sid("box-1")));
    assert!(connector.end().attachment.is_none());
}

#[test]
fn moving_a_connector_reattaches_by_proximity() {
    let mut doc = doc_with_box_and_arrow();
    apply_op(
        &mut doc,
        &Op::Move {
            id: sid("arrow-2"),
            offset: Offset::new(0, 1),
        },
    )
    .expect("move");
    let start = doc
        .get(&sid("arrow-2"))
        .and_then(Shape::as_connector)
        .map(|c| c.start().clone())
        .expect("arrow");
    assert!(start.attachment.is_none());

    apply_op(
        &mut doc,
        &Op::Move {
            id: sid("arrow-2"),
            offset: Offset::new(0, -1),
        },
    )
    .expect("move back");
    let connector = doc
        .get(&sid("arrow-2"))
        .and_then(Shape::as_connector)
        .expect("arrow");
    assert!(connector.start().is_attached_to(&sid("box-1")));
}

#[test]
fn sticky_box_move_reports_dragged_connectors() {
    let mut doc = doc_with_box_and_arrow();
    doc.set_sticky(true);

    let result = apply_op(
        &mut doc,
        &Op::Move {
            id: sid("box-1"),
            offset: Offset::new(1, 0),
        },
    )
    .expect("move");

    assert_eq!(result.delta.updated, vec![sid("arrow-2"), sid("box-1")]);
    assert_eq!(
        connector_points(&doc, "arrow-2"),
        (Point::new(2, 4), Point::new(1, 9))
    );
}

#[test]
fn non_sticky_box_move_leaves_connectors() {
    let mut doc = doc_with_box_and_arrow();
    let result = apply_op(
        &mut doc,
        &Op::Move {
            id: sid("box-1"),
            offset: Offset::new(0, 3),
        },
    )
    .expect("move");

    assert_eq!(result.delta.updated, vec![sid("box-1")]);
    assert_eq!(
        connector_points(&doc, "arrow-2"),
        (Point::new(1, 4), Point::new(1, 9))
    );
}

#[test]
fn resize_clamps_to_floor() {
    let mut doc = doc_with_box();
    for (d_width, d_height, expected) in [
        (2, 1, Size::new(7, 4)),
        (-20, 0, Size::new(3, 4)),
        (0, -9, Size::new(3, 3)),
    ] {
        apply_op(
            &mut doc,
            &Op::Resize {
                id: sid("box-1"),
                d_width,
                d_height,
            },
        )
        .expect("resize");
        assert_eq!(doc.get(&sid("box-1")).expect("box").bounds().size, expected);
    }
}

#[test]
fn resize_rejects_connectors() {
    let mut doc = doc_with_box_and_arrow();
    let err = apply_op(
        &mut doc,
        &Op::Resize {
            id: sid("arrow-2"),
            d_width: 1,
            d_height: 0,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ApplyError::NotABox {
            id: sid("arrow-2"),
            found: ShapeType::Arrow,
        }
    );
}

#[test]
fn toggle_orientation_twice_restores_endpoints() {
    let mut doc = doc_with_box_and_arrow();
    let before = connector_points(&doc, "arrow-2");

    let toggle = Op::ToggleOrientation { id: sid("arrow-2") };
    apply_op(&mut doc, &toggle).expect("toggle");
    assert_eq!(
        connector_points(&doc, "arrow-2"),
        (Point::new(1, 4), Point::new(6, 4))
    );
    let orientation = doc
        .get(&sid("arrow-2"))
        .and_then(Shape::as_connector)
        .map(|c| c.orientation());
    assert_eq!(orientation, Some(Orientation::Vertical));

    apply_op(&mut doc, &toggle).expect("toggle back");
    assert_eq!(connector_points(&doc, "arrow-2"), before);
}

#[test]
fn toggle_orientation_rejects_boxes() {
    let mut doc = doc_with_box();
    let err = apply_op(&mut doc, &Op::ToggleOrientation { id: sid("box-1") }).unwrap_err();
    assert_eq!(err, ApplyError::NotAConnector { id: sid("box-1") });
}

#[test]
fn toggle_border_flips_box_style() {
    let mut doc = doc_with_box();
    apply_op(&mut doc, &Op::ToggleBorder { id: sid("box-1") }).expect("toggle");
    let border = doc
        .get(&sid("box-1"))
        .and_then(Shape::as_box)
        .map(|b| b.border());
    assert_eq!(border, Some(BorderStyle::Hidden));
}

#[test]
fn set_text_reports_truncation() {
    let mut doc = doc_with_box();
    let result = apply_op(
        &mut doc,
        &Op::SetText {
            id: sid("box-1"),
            text: "abc".to_owned(),
        },
    )
    .expect("set text");
    assert_eq!(result.text_fit, Some(TextFit::Fits));

    let result = apply_op(
        &mut doc,
        &Op::SetText {
            id: sid("box-1"),
            text: "abc def".to_owned(),
        },
    )
    .expect("set text");
    assert_eq!(result.text_fit, Some(TextFit::Truncated));
    let text = doc
        .get(&sid("box-1"))
        .and_then(Shape::as_box)
        .map(|b| b.text().to_vec());
    assert_eq!(text, Some(vec!["abc".to_owned()]));
}

#[test]
fn delete_box_detaches_connectors_and_clears_selection() {
    let mut doc = doc_with_box_and_arrow();
    assert!(doc.select(Some(sid("box-1"))));

    let result = apply_op(&mut doc, &Op::Delete { id: sid("box-1") }).expect("delete");
    assert_eq!(result.delta.removed, vec![sid("box-1")]);
    assert_eq!(result.delta.updated, vec![sid("arrow-2")]);
    assert_eq!(doc.selection(), None);

    let connector = doc
        .get(&sid("arrow-2"))
        .and_then(Shape::as_connector)
        .expect("arrow");
    assert!(connector.endpoints().iter().all(|e| e.attachment.is_none()));
    assert_eq!(connector.start().point, Point::new(1, 4));
}

#[test]
fn failing_batch_leaves_document_untouched() {
    let mut doc = doc_with_box();
    let before = doc.clone();

    let err = apply_ops(
        &mut doc,
        &[
            Op::Move {
                id: sid("box-1"),
                offset: Offset::new(1, 1),
            },
            Op::Delete { id: sid("box-99") },
        ],
    )
    .unwrap_err();

    assert_eq!(err, ApplyError::NotFound { id: sid("box-99") });
    assert_eq!(doc, before);
}

#[test]
fn create_then_delete_in_one_batch_leaves_empty_delta() {
    let mut doc = Document::new();
    let result = apply_ops(
        &mut doc,
        &[
            Op::CreateLine {
                start: Point::new(0, 0),
                length: 6,
            },
            Op::Delete { id: sid("line-1") },
        ],
    )
    .expect("apply");
    assert!(result.delta.is_empty());
    assert!(doc.is_empty());
    assert_eq!(doc.next_id(), 2);
}

#[test]
fn moves_past_the_coordinate_limit_are_refused() {
    let mut doc = doc_with_box_and_arrow();
    let before = doc.clone();

    let err = apply_op(
        &mut doc,
        &Op::Move {
            id: sid("arrow-2"),
            offset: Offset::new(0, COORD_LIMIT),
        },
    )
    .unwrap_err();
    assert_eq!(err, ApplyError::OutOfRange { id: sid("arrow-2") });
    assert_eq!(doc, before);

    doc.set_sticky(true);
    let err = apply_op(
        &mut doc,
        &Op::Move {
            id: sid("box-1"),
            offset: Offset::new(-COORD_LIMIT - 1, 0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApplyError::OutOfRange { .. }));
}

#[test]
fn resize_and_create_stop_at_the_coordinate_limit() {
    let mut doc = doc_with_box();
    let err = apply_op(
        &mut doc,
        &Op::Resize {
            id: sid("box-1"),
            d_width: i32::MAX,
            d_height: 0,
        },
    )
    .unwrap_err();
    assert_eq!(err, ApplyError::OutOfRange { id: sid("box-1") });
    assert_eq!(doc.get(&sid("box-1")).expect("box").bounds().size, Size::new(5, 3));

    let err = apply_op(
        &mut doc,
        &Op::CreateArrow {
            start: Point::new(0, COORD_LIMIT - 2),
            length: 6,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApplyError::OutOfRange { .. }));
    assert_eq!(doc.len(), 1);
}

#[test]
fn exhausted_id_counter_fails_creation() {
    let mut doc = Document::new();
    doc.bump_next_id(u64::MAX);

    let err = apply_op(
        &mut doc,
        &Op::CreateBox {
            at: Point::new(0, 0),
            size: Size::new(5, 3),
        },
    )
    .unwrap_err();
    assert_eq!(err, ApplyError::Document(DocumentError::IdsExhausted));
    assert!(doc.is_empty());
}
