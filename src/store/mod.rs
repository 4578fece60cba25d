// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for diagram files on disk.
//!
//! The editor itself only exchanges text; this module reads and atomically writes that text.

pub mod diagram_file;

pub use diagram_file::{DiagramFile, StoreError, WriteDurability};
