// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Longest id accepted from a saved document.
pub const MAX_ID_LEN: usize = 64;

/// A typed identifier; `T` keeps ids of different kinds from being mixed up.
///
/// Generated ids read `<type>-<counter>` (`box-3`). Ids loaded from a file may be any token of
/// ASCII letters, digits, `-`, `_` and `.`, at most [`MAX_ID_LEN`] long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        check_token(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// `<prefix>-<counter>`; `prefix` is one of the fixed type prefixes.
    pub(crate) fn generated(prefix: &str, counter: u64) -> Self {
        debug_assert!(check_token(prefix).is_ok());
        Self {
            value: format!("{prefix}-{counter}"),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// The trailing `-<digits>` counter of generated ids such as `box-12`.
    pub fn numeric_suffix(&self) -> Option<u64> {
        let (_, digits) = self.value.rsplit_once('-')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong { len: usize },
    InvalidChar { ch: char },
    /// The numeric counter leaves no room for another generated id.
    CounterExhausted,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::TooLong { len } => {
                write!(f, "id is {len} characters long, limit is {MAX_ID_LEN}")
            }
            Self::InvalidChar { ch } => write!(f, "id must not contain {ch:?}"),
            Self::CounterExhausted => f.write_str("id counter is at its ceiling"),
        }
    }
}

impl std::error::Error for IdError {}

fn check_token(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(ch) = value
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')))
    {
        return Err(IdError::InvalidChar { ch });
    }
    if value.len() > MAX_ID_LEN {
        return Err(IdError::TooLong { len: value.len() });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeIdTag {}
pub type ShapeId = Id<ShapeIdTag>;

#[cfg(test)]
mod tests {
    use super::{IdError, ShapeId, MAX_ID_LEN};

    #[test]
    fn accepts_generated_and_hand_written_tokens() {
        for value in ["box-1", "arrow_start", "v1.2", "X"] {
            assert!(value.parse::<ShapeId>().is_ok(), "{value}");
        }
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!("".parse::<ShapeId>(), Err(IdError::Empty));
        assert_eq!(
            "box 1".parse::<ShapeId>(),
            Err(IdError::InvalidChar { ch: ' ' })
        );
        assert_eq!(
            "a/b".parse::<ShapeId>(),
            Err(IdError::InvalidChar { ch: '/' })
        );
        assert_eq!(
            "ä".parse::<ShapeId>(),
            Err(IdError::InvalidChar { ch: 'ä' })
        );

        let long = "b".repeat(MAX_ID_LEN + 1);
        assert_eq!(
            ShapeId::new(long),
            Err(IdError::TooLong {
                len: MAX_ID_LEN + 1
            })
        );
    }

    #[test]
    fn numeric_suffix_reads_generated_counters() {
        let id: ShapeId = "box-12".parse().expect("id");
        assert_eq!(id.numeric_suffix(), Some(12));

        let id: ShapeId = "custom".parse().expect("id");
        assert_eq!(id.numeric_suffix(), None);

        let id: ShapeId = "arrow-".parse().expect("id");
        assert_eq!(id.numeric_suffix(), None);
    }
}
