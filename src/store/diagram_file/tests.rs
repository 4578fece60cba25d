// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{discard_on_error, DiagramFile, StoreError, WriteDurability};
use crate::format::MalformedInput;
use crate::model::fixtures::boxes_and_arrow;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("boxline-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[fixture]
fn tmp() -> TempDir {
    TempDir::new("diagram-file")
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".boxline.tmp."))
        .collect()
}

#[rstest]
#[case::best_effort(WriteDurability::BestEffort)]
#[case::durable(WriteDurability::Durable)]
fn save_then_load_restores_document(tmp: TempDir, #[case] durability: WriteDurability) {
    let file = DiagramFile::new(tmp.path().join("diagram.json")).with_durability(durability);
    let document = boxes_and_arrow();

    file.save(&document).unwrap();
    assert!(file.exists());
    assert_eq!(file.load().unwrap(), document);
    assert!(leftover_temp_files(tmp.path()).is_empty());
}

#[rstest]
fn save_text_overwrites_existing_contents(tmp: TempDir) {
    let path = tmp.path().join("diagram.json");
    std::fs::write(&path, "old contents that are longer than the new ones").unwrap();

    let file = DiagramFile::new(&path);
    file.save_text("new").unwrap();
    assert_eq!(file.load_text().unwrap(), "new");
}

#[rstest]
fn load_reports_missing_file(tmp: TempDir) {
    let file = DiagramFile::new(tmp.path().join("missing.json"));
    assert!(!file.exists());

    let err = file.load().unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
}

#[rstest]
fn load_wraps_decode_errors_with_path(tmp: TempDir) {
    let path = tmp.path().join("broken.json");
    std::fs::write(&path, r#"{"format":"boxline","version":9}"#).unwrap();

    let err = DiagramFile::new(&path).load().unwrap_err();
    match err {
        StoreError::Decode {
            path: err_path,
            source,
        } => {
            assert_eq!(err_path, path);
            assert_eq!(
                source.reason(),
                &MalformedInput::UnsupportedVersion { found: 9 }
            );
        }
        other => panic!("expected Decode, got: {other:?}"),
    }
}

#[cfg(unix)]
#[rstest]
fn save_refuses_to_write_through_symlink(tmp: TempDir) {
    let target = tmp.path().join("target.json");
    std::fs::write(&target, "keep").unwrap();
    let link = tmp.path().join("link.json");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let err = DiagramFile::new(&link).save_text("replaced").unwrap_err();
    match err {
        StoreError::SymlinkRefused { path } => assert_eq!(path, link),
        other => panic!("expected SymlinkRefused, got: {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep");
}

#[rstest]
fn save_into_missing_directory_fails_with_io_error(tmp: TempDir) {
    let file = DiagramFile::new(tmp.path().join("nope").join("diagram.json"));
    let err = file.save_text("{}").unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "got: {err:?}");
}

#[rstest]
fn failed_temp_write_removes_the_temp_file(tmp: TempDir) {
    let tmp_path = tmp.path().join(".boxline.tmp.diagram.json.1");
    std::fs::write(&tmp_path, "partial").unwrap();

    let failed = Err(io::Error::new(io::ErrorKind::Other, "sync failed"));
    let err = discard_on_error(&tmp_path, failed).unwrap_err();
    match err {
        StoreError::Io { path, .. } => assert_eq!(path, tmp_path),
        other => panic!("expected Io, got: {other:?}"),
    }
    assert!(leftover_temp_files(tmp.path()).is_empty());
}

#[rstest]
fn successful_temp_write_keeps_the_temp_file(tmp: TempDir) {
    let tmp_path = tmp.path().join(".boxline.tmp.diagram.json.2");
    std::fs::write(&tmp_path, "complete").unwrap();

    discard_on_error(&tmp_path, Ok(())).unwrap();
    assert_eq!(leftover_temp_files(tmp.path()).len(), 1);
}
