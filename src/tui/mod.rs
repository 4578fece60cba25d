// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Boxline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts an [`Editor`] in a ratatui + crossterm shell: maps key events, paints the rasterized
//! document with the selection highlighted, and answers the editor's host requests (save and
//! open prompts, quit confirmation).

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{debug, warn};

use crate::engine::{Editor, HostRequest, Key, Mode, ModeKind, Response};
use crate::model::{self, Point, Size};
use crate::render::LineSpan;
use crate::store::{DiagramFile, WriteDurability};

mod theme;

use theme::TuiTheme;

const TOAST_TTL: Duration = Duration::from_secs(3);
const SELECTED_FLAG: u8 = 0b01;
const EDITING_FLAG: u8 = 0b10;

/// Runs the interactive editor until the user confirms quitting.
///
/// `file` is where `s` saves without asking; without one the first save prompts for a name.
pub fn run(
    editor: Editor,
    file: Option<DiagramFile>,
    durability: WriteDurability,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(editor, file, durability, theme);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Prompt {
    ConfirmQuit,
    SavePath { input: String, text: String },
    OpenPath { input: String },
}

impl Prompt {
    fn label(&self) -> &'static str {
        match self {
            Self::ConfirmQuit => "Quit boxline? (y/n) ",
            Self::SavePath { .. } => "Save as: ",
            Self::OpenPath { .. } => "Open: ",
        }
    }

    fn input(&self) -> &str {
        match self {
            Self::ConfirmQuit => "",
            Self::SavePath { input, .. } | Self::OpenPath { input } => input,
        }
    }

    fn input_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::ConfirmQuit => None,
            Self::SavePath { input, .. } | Self::OpenPath { input } => Some(input),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    is_error: bool,
    expires_at: Instant,
}

struct App {
    editor: Editor,
    file: Option<DiagramFile>,
    durability: WriteDurability,
    theme: TuiTheme,
    prompt: Option<Prompt>,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(
        editor: Editor,
        file: Option<DiagramFile>,
        durability: WriteDurability,
        theme: TuiTheme,
    ) -> Self {
        Self {
            editor,
            file,
            durability,
            theme,
            prompt: None,
            toast: None,
            should_quit: false,
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: false,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn set_error_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: true,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.prompt = Some(Prompt::ConfirmQuit);
            return;
        }

        let Some(mapped) = map_key(key) else {
            debug!(?key, "unmapped key");
            return;
        };
        let response = self.editor.handle_key(mapped);
        self.handle_response(response);
    }

    fn handle_response(&mut self, response: Response) {
        if let Some(notice) = response.notice {
            self.set_toast(notice);
        }

        match response.request {
            None => {}
            Some(HostRequest::ConfirmQuit) => self.prompt = Some(Prompt::ConfirmQuit),
            Some(HostRequest::Save { text }) => match self.file.clone() {
                Some(file) => self.save_to(file, &text),
                None => {
                    self.prompt = Some(Prompt::SavePath {
                        input: String::new(),
                        text,
                    });
                }
            },
            Some(HostRequest::Open) => {
                let input = self
                    .file
                    .as_ref()
                    .map(|file| file.path().display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(Prompt::OpenPath { input });
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        if matches!(prompt, Prompt::ConfirmQuit) {
            self.prompt = None;
            if matches!(key.code, KeyCode::Char('y' | 'Y')) {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => self.submit_prompt(),
            KeyCode::Backspace => {
                if let Some(input) = prompt.input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(input) = prompt.input_mut() {
                    input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };

        let path = prompt.input().trim().to_owned();
        if path.is_empty() {
            self.set_toast("no file name given");
            return;
        }
        let file = DiagramFile::new(path).with_durability(self.durability);

        match prompt {
            Prompt::SavePath { text, .. } => self.save_to(file, &text),
            Prompt::OpenPath { .. } => self.open(file),
            Prompt::ConfirmQuit => {}
        }
    }

    fn save_to(&mut self, file: DiagramFile, text: &str) {
        match file.save_text(text) {
            Ok(()) => {
                self.set_toast(format!("saved {}", file.path().display()));
                self.file = Some(file);
            }
            Err(err) => {
                warn!(error = %err, "save failed");
                self.set_error_toast(err.to_string());
            }
        }
    }

    fn open(&mut self, file: DiagramFile) {
        let loaded = file
            .load_text()
            .map_err(|err| err.to_string())
            .and_then(|text| {
                self.editor
                    .load(&text)
                    .map_err(|err| format!("cannot open {}: {err}", file.path().display()))
            });

        match loaded {
            Ok(()) => {
                self.set_toast(format!("opened {}", file.path().display()));
                self.file = Some(file);
            }
            Err(message) => self.set_error_toast(message),
        }
    }

    fn active_toast(&self, now: Instant) -> Option<&Toast> {
        self.toast.as_ref().filter(|toast| toast.expires_at > now)
    }
}

/// Maps a terminal key event to an editor key; keys the editor has no use for map to `None`.
fn map_key(key: KeyEvent) -> Option<Key> {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    let mapped = match key.code {
        KeyCode::Up if shift => Key::ShiftUp,
        KeyCode::Down if shift => Key::ShiftDown,
        KeyCode::Left if shift => Key::ShiftLeft,
        KeyCode::Right if shift => Key::ShiftRight,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab if shift => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(ch) => Key::Char(ch),
        _ => return None,
    };
    Some(mapped)
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.size());
    let diagram_area = layout[0];
    let status_area = layout[1];

    app.editor.set_viewport(viewport_for(diagram_area));
    draw_diagram(frame, app, diagram_area);
    draw_status(frame, app, status_area, Instant::now());
}

/// The document region shown in `area`; the diagram is always drawn from the origin.
fn viewport_for(area: Rect) -> model::Rect {
    model::Rect::new(
        Point::new(0, 0),
        Size::new(i32::from(area.width), i32::from(area.height)),
    )
}

fn draw_diagram(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let annotated = match app.editor.rasterize_annotated(app.editor.viewport()) {
        Ok(annotated) => annotated,
        Err(err) => {
            let message =
                Paragraph::new(format!("render failed: {err}")).style(app.theme.error_style());
            frame.render_widget(message, area);
            return;
        }
    };

    let canvas = &annotated.canvas;
    let mut flags_by_line = vec![vec![0u8; canvas.width()]; canvas.height()];
    let (highlighted, flag) = match app.editor.mode() {
        Mode::NoSelection => (None, 0),
        Mode::Selected(id) => (Some(id), SELECTED_FLAG),
        Mode::EditingText { id, .. } => (Some(id), EDITING_FLAG),
    };
    if let Some(spans) = highlighted.and_then(|id| annotated.highlight_index.get(&id)) {
        apply_highlight_flags(&mut flags_by_line, spans, flag);
    }

    let lines: Vec<Line<'static>> = canvas
        .rows()
        .zip(&flags_by_line)
        .map(|(row, flags)| styled_row(row, flags, &app.theme))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(app.theme.base_style()), area);

    if app.prompt.is_none() {
        let cursor = app.editor.document().cursor();
        if let (Ok(col), Ok(row)) = (u16::try_from(cursor.col), u16::try_from(cursor.row)) {
            if col < area.width && row < area.height {
                frame.set_cursor(area.x + col, area.y + row);
            }
        }
    }
}

fn apply_highlight_flags(flags_by_line: &mut [Vec<u8>], spans: &[LineSpan], flag: u8) {
    for (y, x0, x1) in spans {
        let Some(line) = flags_by_line.get_mut(*y) else {
            continue;
        };
        if line.is_empty() {
            continue;
        }

        let max_x = line.len() - 1;
        let start = (*x0).min(max_x);
        let end = (*x1).min(max_x);
        for cell in &mut line[start..=end] {
            *cell |= flag;
        }
    }
}

fn style_for_flag(flag: u8, theme: &TuiTheme) -> Style {
    if flag & EDITING_FLAG != 0 {
        theme.editing_style()
    } else if flag & SELECTED_FLAG != 0 {
        theme.selection_style()
    } else {
        Style::default()
    }
}

/// Groups a canvas row into spans of equally highlighted cells.
fn styled_row(row: &[char], flags: &[u8], theme: &TuiTheme) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    let mut run = String::new();
    let mut run_flag = 0u8;

    for (&ch, &flag) in row.iter().zip(flags) {
        if flag != run_flag && !run.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut run),
                style_for_flag(run_flag, theme),
            ));
        }
        run_flag = flag;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, style_for_flag(run_flag, theme)));
    }

    Line::from(spans)
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect, now: Instant) {
    let theme = &app.theme;

    if let Some(prompt) = &app.prompt {
        let label = prompt.label();
        let input = prompt.input();
        let line = Line::from(vec![
            Span::styled(label, theme.prompt_style()),
            Span::raw(input.to_owned()),
        ]);
        frame.render_widget(Paragraph::new(line).style(theme.base_style()), area);

        let width = (label.chars().count() + input.chars().count()) as u16;
        frame.set_cursor(area.x + width.min(area.width.saturating_sub(1)), area.y);
        return;
    }

    let line = status_line(app, now);
    frame.render_widget(Paragraph::new(line).style(theme.status_style()), area);
}

fn status_line(app: &App, now: Instant) -> Line<'static> {
    let theme = &app.theme;
    let status = app.editor.status();

    let mut spans = vec![
        Span::styled(format!(" {} ", status.mode.label()), theme.status_key_style()),
        Span::raw(if status.sticky { " Sticky" } else { " Nonsticky" }),
        Span::raw(format!("  {},{}", status.cursor.row, status.cursor.col)),
    ];
    if let Some((id, _)) = &status.selected {
        spans.push(Span::raw(format!("  {id}")));
    }

    let sticky_target = if status.sticky { "Nonsticky" } else { "Sticky" };
    let hints: &[(&str, &str)] = match status.mode {
        ModeKind::NoSelection => &[("Enter", "Select"), ("b/c/a", "New"), ("q", "Quit")],
        ModeKind::Selected => &[("Enter", "Edit"), ("Space", "Toggle"), ("d", "Delete")],
        ModeKind::EditingText => &[("Esc", "Done")],
    };
    for (key, label) in hints {
        push_hint(&mut spans, theme, key, label);
    }
    if status.mode != ModeKind::EditingText {
        push_hint(&mut spans, theme, "t", sticky_target);
    }

    if let Some(toast) = app.active_toast(now) {
        let style = if toast.is_error {
            theme.error_style()
        } else {
            theme.status_style()
        };
        spans.push(Span::raw("  | "));
        spans.push(Span::styled(toast.message.clone(), style));
    }

    Line::from(spans)
}

fn push_hint(spans: &mut Vec<Span<'static>>, theme: &TuiTheme, key: &str, label: &str) {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(key.to_owned(), theme.status_key_style()));
    spans.push(Span::raw(format!(" {label}")));
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
