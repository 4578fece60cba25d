// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cursor, selection and key dispatch.
//!
//! The editor consumes one host-independent [`Key`] at a time and answers with a [`Response`].
//! It never reads input, paints, prompts or touches files; those are [`HostRequest`]s.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::format::{self, DecodeError, EncodeError};
use crate::model::{
    clamp, Direction, Document, Offset, Point, Rect, Shape, ShapeId, ShapeKind, ShapeType, Size,
    TextFit,
};
use crate::ops::{apply_op, ApplyError, ApplyResult, Delta, Op};
use crate::render::{self, AnnotatedCanvas, Canvas, CanvasError};

/// A key press, already decoded from the terminal's representation.
///
/// Letters arrive as `Char`, with case preserved; Space is `Char(' ')`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    ShiftUp,
    ShiftDown,
    ShiftLeft,
    ShiftRight,
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Char(char),
}

/// The editor's interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    NoSelection,
    Selected(ShapeId),
    EditingText { id: ShapeId, buffer: String },
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::NoSelection => ModeKind::NoSelection,
            Self::Selected(_) => ModeKind::Selected,
            Self::EditingText { .. } => ModeKind::EditingText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    NoSelection,
    Selected,
    EditingText,
}

impl ModeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoSelection => "CURSOR",
            Self::Selected => "SELECT",
            Self::EditingText => "EDIT",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something only the host can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    ConfirmQuit,
    Save { text: String },
    Open,
}

/// The outcome of one key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub delta: Delta,
    /// Whether anything visible changed.
    pub redraw: bool,
    pub request: Option<HostRequest>,
    /// A short status message for the host to surface (e.g. text truncation).
    pub notice: Option<String>,
}

impl Response {
    fn unchanged() -> Self {
        Self::default()
    }

    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn request(request: HostRequest) -> Self {
        Self {
            request: Some(request),
            ..Self::default()
        }
    }

    fn applied(result: ApplyResult) -> Self {
        Self {
            delta: result.delta,
            redraw: true,
            ..Self::default()
        }
    }
}

/// What the host status bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub mode: ModeKind,
    pub sticky: bool,
    pub cursor: Point,
    pub selected: Option<(ShapeId, ShapeType)>,
    pub shape_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextEdit {
    id: ShapeId,
    buffer: String,
}

/// The editing engine: a document plus cursor, selection and text-edit state.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    editing: Option<TextEdit>,
    config: EditorConfig,
    viewport: Rect,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let mut document = Document::new();
        document.set_sticky(config.sticky_default);
        Self::with_document(document, config)
    }

    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        Self {
            document,
            editing: None,
            config,
            viewport: Rect::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        if let Some(edit) = &self.editing {
            return Mode::EditingText {
                id: edit.id.clone(),
                buffer: edit.buffer.clone(),
            };
        }
        match self.document.selection() {
            Some(id) => Mode::Selected(id.clone()),
            None => Mode::NoSelection,
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Sets the visible area (in document coordinates) the cursor is clamped to.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        let cursor = clamp(self.document.cursor(), viewport);
        self.document.set_cursor(cursor);
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            mode: self.mode().kind(),
            sticky: self.document.sticky(),
            cursor: self.document.cursor(),
            selected: self
                .document
                .selected_shape()
                .map(|shape| (shape.id().clone(), shape.shape_type())),
            shape_count: self.document.len(),
        }
    }

    /// The document in the persisted text format.
    pub fn encode(&self) -> Result<String, EncodeError> {
        format::encode(&self.document)
    }

    /// Replaces the document with `text`. On error nothing changes.
    pub fn load(&mut self, text: &str) -> Result<(), DecodeError> {
        let mut document = format::decode(text).map_err(|err| {
            warn!(error = %err, "document load rejected");
            err
        })?;
        document.set_cursor(clamp(self.document.cursor(), self.viewport));

        info!(shapes = document.len(), sticky = document.sticky(), "document loaded");
        self.document = document;
        self.editing = None;
        Ok(())
    }

    /// Rasterizes the document, previewing an in-progress text edit.
    pub fn rasterize(&self, viewport: Rect) -> Result<Canvas, CanvasError> {
        match self.preview_document() {
            Some(preview) => render::rasterize(&preview, viewport),
            None => render::rasterize(&self.document, viewport),
        }
    }

    pub fn rasterize_annotated(&self, viewport: Rect) -> Result<AnnotatedCanvas, CanvasError> {
        match self.preview_document() {
            Some(preview) => render::rasterize_annotated(&preview, viewport),
            None => render::rasterize_annotated(&self.document, viewport),
        }
    }

    fn preview_document(&self) -> Option<Document> {
        let edit = self.editing.as_ref()?;
        let mut preview = self.document.clone();
        preview
            .get_mut(&edit.id)
            .and_then(Shape::as_box_mut)?
            .set_text(&edit.buffer);
        Some(preview)
    }

    pub fn handle_key(&mut self, key: Key) -> Response {
        if self.editing.is_some() {
            return self.handle_editing_key(key);
        }

        let response = match key {
            Key::Up => self.step(Offset::new(-1, 0)),
            Key::Down => self.step(Offset::new(1, 0)),
            Key::Left => self.step(Offset::new(0, -1)),
            Key::Right => self.step(Offset::new(0, 1)),
            Key::Char('k') => self.step(Offset::new(-1, 0)),
            Key::Char('j') => self.step(Offset::new(1, 0)),
            Key::Char('h') => self.step(Offset::new(0, -1)),
            Key::Char('l') => self.step(Offset::new(0, 1)),
            Key::ShiftUp | Key::Char('K') => self.resize_selected(0, -1),
            Key::ShiftDown | Key::Char('J') => self.resize_selected(0, 1),
            Key::ShiftLeft | Key::Char('H') => self.resize_selected(-1, 0),
            Key::ShiftRight | Key::Char('L') => self.resize_selected(1, 0),
            Key::Enter => self.enter(),
            Key::Esc => self.deselect(),
            Key::Tab => self.cycle_selection(false),
            Key::BackTab => self.cycle_selection(true),
            Key::Char(' ') => self.toggle_selected(),
            Key::Char('t') => self.toggle_sticky(),
            Key::Char('b') => self.create(ShapeType::Box),
            Key::Char('c') => self.create(ShapeType::Line),
            Key::Char('a') => self.create(ShapeType::Arrow),
            Key::Char('d') => self.delete_selected(),
            Key::Char('q') => Response::request(HostRequest::ConfirmQuit),
            Key::Char('s') => self.save(),
            Key::Char('o') => Response::request(HostRequest::Open),
            Key::Backspace | Key::Char(_) => Response::unchanged(),
        };

        if !response.redraw && response.request.is_none() {
            debug!(?key, "key ignored");
        }
        response
    }

    fn handle_editing_key(&mut self, key: Key) -> Response {
        let Some(edit) = self.editing.as_mut() else {
            return Response::unchanged();
        };
        match key {
            Key::Char(ch) => {
                edit.buffer.push(ch);
                Response::redraw()
            }
            Key::Enter => {
                edit.buffer.push('\n');
                Response::redraw()
            }
            Key::Backspace => {
                if edit.buffer.pop().is_some() {
                    Response::redraw()
                } else {
                    Response::unchanged()
                }
            }
            Key::Esc => self.commit_text(),
            _ => Response::unchanged(),
        }
    }

    fn commit_text(&mut self) -> Response {
        let Some(edit) = self.editing.take() else {
            return Response::unchanged();
        };
        let op = Op::SetText {
            id: edit.id,
            text: edit.buffer,
        };
        let Some(result) = self.try_apply(&op) else {
            return Response::redraw();
        };
        let truncated = result.text_fit == Some(TextFit::Truncated);
        let mut response = Response::applied(result);
        if truncated {
            response.notice = Some("text truncated to fit the box".to_owned());
        }
        response
    }

    fn save(&self) -> Response {
        match self.encode() {
            Ok(text) => Response::request(HostRequest::Save { text }),
            Err(err) => {
                warn!(error = %err, "document encode failed");
                Response {
                    notice: Some(err.to_string()),
                    ..Response::default()
                }
            }
        }
    }

    fn step(&mut self, offset: Offset) -> Response {
        match self.document.selection().cloned() {
            Some(id) => self.apply(&Op::Move { id, offset }),
            None => self.move_cursor(offset),
        }
    }

    fn move_cursor(&mut self, offset: Offset) -> Response {
        let current = self.document.cursor();
        let next = clamp(current + offset, self.viewport);
        if next == current {
            return Response::unchanged();
        }
        self.document.set_cursor(next);
        Response::redraw()
    }

    fn resize_selected(&mut self, d_width: i32, d_height: i32) -> Response {
        let Some(id) = self.document.selection().cloned() else {
            return Response::unchanged();
        };
        self.apply(&Op::Resize {
            id,
            d_width,
            d_height,
        })
    }

    fn enter(&mut self) -> Response {
        let Some(shape) = self.document.selected_shape() else {
            let Some(id) = self
                .document
                .topmost_at(self.document.cursor())
                .map(|shape| shape.id().clone())
            else {
                return Response::unchanged();
            };
            self.document.select(Some(id));
            return Response::redraw();
        };

        let Some(boxed) = shape.as_box() else {
            return Response::unchanged();
        };
        self.editing = Some(TextEdit {
            id: shape.id().clone(),
            buffer: boxed.text_buffer(),
        });
        Response::redraw()
    }

    fn deselect(&mut self) -> Response {
        if self.document.selection().is_none() {
            return Response::unchanged();
        }
        self.document.select(None);
        Response::redraw()
    }

    /// Tab order is z-order and wraps around.
    fn cycle_selection(&mut self, backwards: bool) -> Response {
        let len = self.document.len();
        if len == 0 {
            return Response::unchanged();
        }

        let current = self
            .document
            .selection()
            .and_then(|id| self.document.index_of(id));
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(index), false) => (index + 1) % len,
            (Some(index), true) => (index + len - 1) % len,
        };

        let id = self.document.shapes()[next].id().clone();
        self.document.select(Some(id));
        Response::redraw()
    }

    fn toggle_selected(&mut self) -> Response {
        let Some(shape) = self.document.selected_shape() else {
            return Response::unchanged();
        };
        let id = shape.id().clone();
        let op = match shape.kind() {
            ShapeKind::Box(_) => Op::ToggleBorder { id },
            ShapeKind::Line(_) | ShapeKind::Arrow(_) => Op::ToggleOrientation { id },
        };
        self.apply(&op)
    }

    fn toggle_sticky(&mut self) -> Response {
        let sticky = !self.document.sticky();
        self.document.set_sticky(sticky);
        debug!(sticky, "sticky mode toggled");
        Response::redraw()
    }

    fn create(&mut self, shape_type: ShapeType) -> Response {
        let box_size = self.config.default_box_size;
        let length = self.config.default_line_length;
        let op = match shape_type {
            ShapeType::Box => Op::CreateBox {
                at: self.box_placement(box_size),
                size: box_size,
            },
            ShapeType::Line => Op::CreateLine {
                start: self.connector_placement(),
                length,
            },
            ShapeType::Arrow => Op::CreateArrow {
                start: self.connector_placement(),
                length,
            },
        };

        let response = self.apply(&op);
        if let Some(id) = response.delta.added.first() {
            self.document.select(Some(id.clone()));
        }
        response
    }

    /// Top-left for a new box: next to the selection, or at the cursor.
    fn box_placement(&self, size: Size) -> Point {
        match self.document.selected_shape().map(Shape::kind) {
            Some(ShapeKind::Box(selected)) => {
                let rect = selected.rect();
                Point::new(rect.top(), rect.right() + 2)
            }
            Some(ShapeKind::Line(connector) | ShapeKind::Arrow(connector)) => {
                let end = connector.end().point;
                match connector.end_direction() {
                    Direction::Right => Point::new(end.row - size.height / 2, end.col + 1),
                    Direction::Left => Point::new(end.row - size.height / 2, end.col - size.width),
                    Direction::Down => Point::new(end.row + 1, end.col - size.width / 2),
                    Direction::Up => Point::new(end.row - size.height, end.col - size.width / 2),
                }
            }
            None => self.document.cursor(),
        }
    }

    /// Start point for a new connector: the middle of a selected box's right border, one cell
    /// past a selected connector's end, or the cursor.
    fn connector_placement(&self) -> Point {
        match self.document.selected_shape().map(Shape::kind) {
            Some(ShapeKind::Box(selected)) => {
                let rect = selected.rect();
                Point::new(rect.top() + rect.size.height / 2, rect.right())
            }
            Some(ShapeKind::Line(connector) | ShapeKind::Arrow(connector)) => {
                connector.end().point + connector.end_direction().unit()
            }
            None => self.document.cursor(),
        }
    }

    fn delete_selected(&mut self) -> Response {
        let Some(id) = self.document.selection().cloned() else {
            return Response::unchanged();
        };
        let response = self.apply(&Op::Delete { id });
        self.document.select(None);
        response
    }

    fn apply(&mut self, op: &Op) -> Response {
        match self.try_apply(op) {
            Some(result) => Response::applied(result),
            None => Response::unchanged(),
        }
    }

    /// Commands without a valid target are no-ops, never errors.
    fn try_apply(&mut self, op: &Op) -> Option<ApplyResult> {
        match apply_op(&mut self.document, op) {
            Ok(result) => {
                debug!(?op, delta = ?result.delta, "op applied");
                Some(result)
            }
            Err(err) => {
                log_ignored(op, &err);
                None
            }
        }
    }
}

fn log_ignored(op: &Op, err: &ApplyError) {
    debug!(?op, error = %err, "op ignored");
}
