// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor defaults, overridable through the environment.
//!
//! - `BOXLINE_BOX_SIZE`: default box size as `WxH` (e.g. `9x5`); raised to the 3x3 floor.
//! - `BOXLINE_LINE_LENGTH`: default connector length in cells (at least 1).
//! - `BOXLINE_STICKY`: initial sticky mode (`1`/`0`, `true`/`false`, `on`/`off`).
//!
//! Unset or blank variables keep the built-in default.

use std::{env, error::Error, fmt};

use crate::model::{Size, MIN_BOX_HEIGHT, MIN_BOX_WIDTH};

pub const BOX_SIZE_ENV: &str = "BOXLINE_BOX_SIZE";
pub const LINE_LENGTH_ENV: &str = "BOXLINE_LINE_LENGTH";
pub const STICKY_ENV: &str = "BOXLINE_STICKY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub default_box_size: Size,
    pub default_line_length: i32,
    pub sticky_default: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_box_size: Size::new(5, 3),
            default_line_length: 6,
            sticky_default: false,
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnv {
                name: name.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        })
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Result<Option<String>, ConfigError>,
    {
        let mut config = Self::default();

        if let Some(value) = non_blank(lookup(BOX_SIZE_ENV)?) {
            let size = parse_size(&value).ok_or_else(|| invalid(BOX_SIZE_ENV, &value))?;
            config.default_box_size = Size::new(
                size.width.max(MIN_BOX_WIDTH),
                size.height.max(MIN_BOX_HEIGHT),
            );
        }

        if let Some(value) = non_blank(lookup(LINE_LENGTH_ENV)?) {
            let length: i32 = value
                .parse()
                .ok()
                .filter(|length| *length >= 1)
                .ok_or_else(|| invalid(LINE_LENGTH_ENV, &value))?;
            config.default_line_length = length;
        }

        if let Some(value) = non_blank(lookup(STICKY_ENV)?) {
            config.sticky_default =
                parse_flag(&value).ok_or_else(|| invalid(STICKY_ENV, &value))?;
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        name: name.to_owned(),
        value: value.to_owned(),
    }
}

fn parse_size(value: &str) -> Option<Size> {
    let lower = value.to_ascii_lowercase();
    let (width, height) = lower.split_once('x')?;
    let width: i32 = width.trim().parse().ok()?;
    let height: i32 = height.trim().parse().ok()?;
    (width > 0 && height > 0).then(|| Size::new(width, height))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ConfigError, EditorConfig, BOX_SIZE_ENV, LINE_LENGTH_ENV, STICKY_ENV};
    use crate::model::Size;

    fn config_from(vars: &[(&str, &str)]) -> Result<EditorConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        EditorConfig::from_lookup(|name| Ok(vars.get(name).cloned()))
    }

    #[test]
    fn missing_variables_keep_defaults() {
        assert_eq!(config_from(&[]).unwrap(), EditorConfig::default());
        assert_eq!(
            config_from(&[(BOX_SIZE_ENV, "  ")]).unwrap(),
            EditorConfig::default()
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            (BOX_SIZE_ENV, "9x5"),
            (LINE_LENGTH_ENV, "12"),
            (STICKY_ENV, "on"),
        ])
        .unwrap();
        assert_eq!(config.default_box_size, Size::new(9, 5));
        assert_eq!(config.default_line_length, 12);
        assert!(config.sticky_default);
    }

    #[test]
    fn box_size_is_raised_to_the_floor() {
        let config = config_from(&[(BOX_SIZE_ENV, "1X2")]).unwrap();
        assert_eq!(config.default_box_size, Size::new(3, 3));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (name, value) in [
            (BOX_SIZE_ENV, "wide"),
            (BOX_SIZE_ENV, "0x4"),
            (LINE_LENGTH_ENV, "0"),
            (STICKY_ENV, "maybe"),
        ] {
            let err = config_from(&[(name, value)]).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidEnv {
                    name: name.to_owned(),
                    value: value.to_owned(),
                }
            );
        }
    }
}
