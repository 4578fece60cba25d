// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Boxline: a keyboard-driven editor for box, line and arrow diagrams drawn with
//! box-drawing characters.
//!
//! The editing core ([`engine`], [`ops`], [`attach`], [`model`], [`render`], [`format`]) never
//! touches the terminal or the file system; [`tui`] and [`store`] host it.

pub mod attach;
pub mod config;
pub mod engine;
pub mod format;
pub mod model;
pub mod ops;
pub mod render;
pub mod store;
pub mod tui;
