// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use boxline::model::{Document, Point, ShapeId, Size};
use boxline::ops::{apply_ops, Op};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("boxline_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub mod grid {
    use super::*;

    const BOX_SIZE: Size = Size::new(9, 4);
    const ROW_PITCH: i32 = 6;
    const COL_PITCH: i32 = 14;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Params {
        pub rows: i32,
        pub cols: i32,
        pub label_lines: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Case {
        Small,
        Medium,
        LargeLabeled,
    }

    impl Case {
        pub const fn id(self) -> &'static str {
            match self {
                Self::Small => "small",
                Self::Medium => "medium",
                Self::LargeLabeled => "large_labeled",
            }
        }

        pub const fn params(self) -> Params {
            match self {
                Self::Small => Params {
                    rows: 4,
                    cols: 4,
                    label_lines: 1,
                },
                Self::Medium => Params {
                    rows: 12,
                    cols: 12,
                    label_lines: 1,
                },
                Self::LargeLabeled => Params {
                    rows: 30,
                    cols: 20,
                    label_lines: 2,
                },
            }
        }
    }

    /// A `rows` x `cols` grid of labeled boxes, each joined to its right-hand neighbor by an
    /// arrow attached at both ends.
    ///
    /// Boxes are created first, so box `(r, c)` is `box-{r * cols + c + 1}`.
    pub fn grid(params: Params) -> Document {
        let mut ops = Vec::new();
        for row in 0..params.rows {
            for col in 0..params.cols {
                ops.push(Op::CreateBox {
                    at: Point::new(row * ROW_PITCH, col * COL_PITCH),
                    size: BOX_SIZE,
                });
            }
        }

        for index in 0..params.rows * params.cols {
            let label = (0..params.label_lines)
                .map(|line| format!("n{index}.{line}"))
                .collect::<Vec<_>>()
                .join("\n");
            ops.push(Op::SetText {
                id: ShapeId::new(format!("box-{}", index + 1)).expect("valid box id"),
                text: label,
            });
        }

        let arrow_length = COL_PITCH - BOX_SIZE.width + 2;
        for row in 0..params.rows {
            for col in 0..params.cols - 1 {
                ops.push(Op::CreateArrow {
                    start: Point::new(row * ROW_PITCH + 1, col * COL_PITCH + BOX_SIZE.width - 1),
                    length: arrow_length,
                });
            }
        }

        let mut document = Document::new();
        apply_ops(&mut document, &ops).expect("grid ops");
        document
    }

    pub fn fixture(case: Case) -> Document {
        grid(case.params())
    }
}
