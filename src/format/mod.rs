// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document serialization.
//!
//! Documents are written as versioned, pretty-printed JSON. Decoding also accepts the flat
//! object list written by earlier box/line drawing tools (a top-level JSON array), which is
//! imported and re-encoded in the current format on the next save.

use std::fmt;

use crate::model::{Document, IdError};

mod document;
mod legacy;

pub use document::{FORMAT_NAME, FORMAT_VERSION};

/// Serializes `document` (shapes, attachments, sticky flag, id counter).
///
/// Selection and cursor are session state and are not written.
pub fn encode(document: &Document) -> Result<String, EncodeError> {
    document::encode(document)
}

/// Parses a document. All-or-nothing: any problem rejects the whole input.
pub fn decode(text: &str) -> Result<Document, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(syntax_error)?;
    if value.is_array() {
        return legacy::decode(value);
    }
    document::decode(value)
}

pub(crate) fn syntax_error(err: serde_json::Error) -> DecodeError {
    DecodeError::MalformedInput(MalformedInput::Syntax {
        message: err.to_string(),
        line: err.line(),
        column: err.column(),
    })
}

#[derive(Debug)]
pub struct EncodeError {
    source: serde_json::Error,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot encode document: {}", self.source)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(source: serde_json::Error) -> Self {
        Self { source }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MalformedInput(MalformedInput),
}

impl DecodeError {
    pub fn reason(&self) -> &MalformedInput {
        match self {
            Self::MalformedInput(reason) => reason,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput(reason) => write!(f, "malformed document: {reason}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedInput(reason) => Some(reason),
        }
    }
}

impl From<MalformedInput> for DecodeError {
    fn from(value: MalformedInput) -> Self {
        Self::MalformedInput(value)
    }
}

/// Why an input was rejected. Shape references are the raw id text (or a `shapes[i]` path when
/// the id itself is unusable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    /// Not JSON, or JSON of the wrong structure.
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
    UnsupportedFormat {
        found: String,
    },
    UnsupportedVersion {
        found: u64,
    },
    InvalidId {
        field: String,
        value: String,
        source: IdError,
    },
    DuplicateId {
        id: String,
    },
    DanglingAttachment {
        shape: String,
        box_id: String,
    },
    AttachmentNotABox {
        shape: String,
        target: String,
    },
    BoxTooSmall {
        shape: String,
        width: i32,
        height: i32,
    },
    InvalidGeometry {
        shape: String,
        reason: &'static str,
    },
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax {
                message,
                line,
                column,
            } => write!(f, "invalid json at {line}:{column}: {message}"),
            Self::UnsupportedFormat { found } => write!(f, "unsupported format {found:?}"),
            Self::UnsupportedVersion { found } => write!(f, "unsupported version {found}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::DuplicateId { id } => write!(f, "duplicate shape id {id}"),
            Self::DanglingAttachment { shape, box_id } => {
                write!(f, "{shape} is attached to missing shape {box_id}")
            }
            Self::AttachmentNotABox { shape, target } => {
                write!(f, "{shape} is attached to {target}, which is not a box")
            }
            Self::BoxTooSmall {
                shape,
                width,
                height,
            } => write!(f, "box {shape} is {width}x{height}, below the 3x3 minimum"),
            Self::InvalidGeometry { shape, reason } => {
                write!(f, "invalid geometry for {shape}: {reason}")
            }
        }
    }
}

impl std::error::Error for MalformedInput {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            _ => None,
        }
    }
}
