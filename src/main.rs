// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Boxline CLI entrypoint.
//!
//! Runs the interactive editor on an optional diagram file. `--render` prints the file's
//! diagram to stdout instead.
//!
//! Diagnostics are off unless `BOXLINE_LOG` holds a filter directive (e.g. `boxline=debug`);
//! they go to `BOXLINE_LOG_FILE` (default `boxline.log`) so the alternate screen stays clean.

use std::env;
use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;

use boxline::config::EditorConfig;
use boxline::engine::Editor;
use boxline::render;
use boxline::store::{DiagramFile, StoreError, WriteDurability};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BOXLINE_LOG";
const LOG_FILE_ENV: &str = "BOXLINE_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "boxline.log";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<file>] [--durable-writes]\n  {program} [--file <file>] [--durable-writes]\n  {program} --render <file>\n\nWithout a file the editor starts empty and asks for a name on the first save.\nA file that does not exist yet is created on the first save.\n\n--render prints the diagram stored in <file> and exits.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    render: bool,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--render" => {
                if options.render {
                    return Err(());
                }
                options.render = true;
            }
            "--file" => {
                if options.file.is_some() {
                    return Err(());
                }
                let file = args.next().ok_or(())?;
                options.file = Some(file);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    if options.render && options.file.is_none() {
        return Err(());
    }

    Ok(options)
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let Ok(directive) = env::var(LOG_ENV) else {
        return Ok(());
    };
    let filter = if directive.trim().is_empty() {
        EnvFilter::try_new("boxline=info")?
    } else {
        EnvFilter::try_new(directive.trim())?
    };

    let path = env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_owned());
    install_file_logger(filter, &path)
}

/// Installs the global subscriber; fails if one is already set.
fn install_file_logger(filter: EnvFilter, path: &str) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;
    Ok(())
}

fn render_file(file: &DiagramFile) -> Result<(), Box<dyn Error>> {
    let document = file.load()?;
    let canvas = render::rasterize(&document, document.extent())?;
    let text = canvas.to_string_trimmed();
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = env::args();
        let program = args.next().unwrap_or_else(|| "boxline".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging()?;

        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        let file = options
            .file
            .map(|path| DiagramFile::new(path).with_durability(durability));

        if let Some(file) = file.as_ref().filter(|_| options.render) {
            return render_file(file);
        }

        let config = EditorConfig::from_env()?;
        let mut editor = Editor::new(config);
        if let Some(file) = file.as_ref().filter(|file| file.exists()) {
            let text = file.load_text()?;
            editor.load(&text).map_err(|source| StoreError::Decode {
                path: file.path().to_path_buf(),
                source,
            })?;
        }

        boxline::tui::run(editor, file, durability)
    })();

    if let Err(err) = result {
        eprintln!("boxline: {err}");
        std::process::exit(1);
    }
}
