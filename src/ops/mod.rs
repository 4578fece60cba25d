// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for documents.
//!
//! Ops are applied all-or-nothing and produce a minimal delta that the host can use to decide
//! what to redraw.

use std::collections::HashSet;
use std::fmt;

use crate::attach;
use crate::model::{
    BoxShape, Connector, Document, DocumentError, Offset, Point, Shape, ShapeId, ShapeKind,
    ShapeType, Size, TextFit,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    CreateBox { at: Point, size: Size },
    CreateLine { start: Point, length: i32 },
    CreateArrow { start: Point, length: i32 },
    Move { id: ShapeId, offset: Offset },
    Resize { id: ShapeId, d_width: i32, d_height: i32 },
    ToggleOrientation { id: ShapeId },
    ToggleBorder { id: ShapeId },
    SetText { id: ShapeId, text: String },
    Delete { id: ShapeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
    /// Outcome of the last `SetText` in the batch, if any.
    pub text_fit: Option<TextFit>,
}

/// Minimal delta describing which shapes changed as the result of applying ops.
///
/// Connectors dragged or detached by a box edit are reported as updated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ShapeId>,
    pub removed: Vec<ShapeId>,
    pub updated: Vec<ShapeId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ShapeId>,
    removed: HashSet<ShapeId>,
    updated: HashSet<ShapeId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, id: ShapeId) {
        self.removed.remove(&id);
        self.updated.remove(&id);
        self.added.insert(id);
    }

    fn record_removed(&mut self, id: ShapeId) {
        // Added then removed within one batch leaves no trace.
        if self.added.remove(&id) {
            self.updated.remove(&id);
            return;
        }
        self.updated.remove(&id);
        self.removed.insert(id);
    }

    fn record_updated(&mut self, id: ShapeId) {
        if self.added.contains(&id) || self.removed.contains(&id) {
            return;
        }
        self.updated.insert(id);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta {
            added,
            removed,
            updated,
        }
    }
}

/// Applies `ops` in order. On error the document is left untouched.
///
/// A batch that would put any created or changed shape outside the coordinate range is
/// refused as a whole.
pub fn apply_ops(document: &mut Document, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            applied: 0,
            delta: Delta::default(),
            text_fit: None,
        });
    }

    let mut working = document.clone();
    let mut delta = DeltaBuilder::default();
    let mut text_fit = None;

    for op in ops {
        if let Some(fit) = apply_one(&mut working, op, &mut delta)? {
            text_fit = Some(fit);
        }
    }

    let delta = delta.finish();
    let escaped = delta.added.iter().chain(&delta.updated).find(|id| {
        working
            .get(id)
            .is_some_and(|shape| !shape.bounds().in_coord_range())
    });
    if let Some(id) = escaped {
        return Err(ApplyError::OutOfRange { id: id.clone() });
    }

    *document = working;
    Ok(ApplyResult {
        applied: ops.len(),
        delta,
        text_fit,
    })
}

pub fn apply_op(document: &mut Document, op: &Op) -> Result<ApplyResult, ApplyError> {
    apply_ops(document, std::slice::from_ref(op))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    NotFound { id: ShapeId },
    NotABox { id: ShapeId, found: ShapeType },
    NotAConnector { id: ShapeId },
    OutOfRange { id: ShapeId },
    Document(DocumentError),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "shape not found (id={id})"),
            Self::NotABox { id, found } => write!(f, "shape {id} is a {found}, not a box"),
            Self::NotAConnector { id } => write!(f, "shape {id} is a box, not a line or arrow"),
            Self::OutOfRange { id } => {
                write!(f, "shape {id} would leave the supported coordinate range")
            }
            Self::Document(err) => write!(f, "document error: {err}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for ApplyError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

// Per-op mutation helpers.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
