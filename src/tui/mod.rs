// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Transcript on the left, SOAP note on the right. All review state lives in [`Review`]; this
//! module only translates terminal input into review transitions, runs persistence on the tokio
//! runtime and renders whatever the review state says.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
};
use tracing::debug;

use crate::model::NoteSpanId;
use crate::query::spans_by_section;
use crate::review::{
    EditError, NavKey, NoteSpanVisual, NoticeLevel, PendingSave, Review, ReviewEvent, SaveOutcome,
    SegmentVisual,
};
use crate::store::{SessionStore, SignReceipt, StoreError};

mod theme;

pub use theme::ThemeError;
use theme::TuiTheme;

const TOAST_TTL: Duration = Duration::from_secs(2);
const MOUSE_SCROLL_ROWS: i32 = 3;

/// Runs the interactive terminal UI until the user quits.
///
/// `loaded` is the outcome of loading the session; a load failure is shown in place of the
/// panes. Persistence calls are spawned on `runtime`, so the caller must keep it alive.
pub fn run(
    loaded: Result<Review, StoreError>,
    store: Arc<dyn SessionStore>,
    runtime: Handle,
) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(loaded, store, runtime, theme);

    while !app.should_quit {
        app.drain_completions();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (header_area, main_area, footer_area) = (layout[0], layout[1], layout[2]);

    app.expire_toast();
    app.observe_review();

    let Some(review) = app.review.as_ref() else {
        let message = app.load_error.clone().unwrap_or_else(|| "No session loaded".to_owned());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(view_title("Session", '!', None))
            .border_style(app.theme.error_style());
        let body = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(message, app.theme.error_style())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(body, main_area);
        frame.render_widget(Paragraph::new(footer_line(app)), footer_area);
        return;
    };

    let direction = if stack_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_area);

    let note_focused = review.edit().is_editing() || review.selection().focused_note_index().is_some();
    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .title(view_title(
            "Transcript",
            '1',
            Some(&format!("{} segments", review.segments().len())),
        ))
        .border_style(app.theme.panel_border_style(false));
    let note_tail = match review.edit().target() {
        Some(span_id) => format!("editing {span_id}"),
        None if review.is_read_only() => "read-only".to_owned(),
        None => format!("{} statements", review.note_spans().len()),
    };
    let note_block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Note", '2', Some(&note_tail)))
        .border_style(app.theme.panel_border_style(note_focused));
    let transcript_inner = transcript_block.inner(panes[0]);
    let note_inner = note_block.inner(panes[1]);

    let header = header_line(review, &app.theme);
    let transcript = transcript_content(review, &app.theme, usize::from(transcript_inner.width));
    let note = note_content(review, &app.theme, usize::from(note_inner.width));
    let focus = review.selection().focused_note_index();
    let first_active_segment = review
        .segments()
        .iter()
        .position(|segment| review.selection().is_segment_active(segment.id()));

    app.transcript_view.layout(transcript_inner, &transcript);
    app.note_view.layout(note_inner, &note);
    if std::mem::take(&mut app.center_note) {
        if let Some(focus) = focus {
            app.note_view.center_on(focus);
        }
    }
    if std::mem::take(&mut app.follow_transcript) {
        if let Some(idx) = first_active_segment {
            app.transcript_view.center_on(idx);
        }
    }

    frame.render_widget(Paragraph::new(header), header_area);
    frame.render_widget(
        Paragraph::new(transcript.lines)
            .block(transcript_block)
            .scroll((app.transcript_view.scroll, 0)),
        panes[0],
    );
    frame.render_widget(
        Paragraph::new(note.lines).block(note_block).scroll((app.note_view.scroll, 0)),
        panes[1],
    );
    frame.render_widget(Paragraph::new(footer_line(app)), footer_area);
}

include!("chrome.rs");

/// Result of a persistence call spawned on the runtime.
#[derive(Debug)]
enum Completion {
    Save { pending: PendingSave, result: Result<crate::model::NoteSpan, StoreError> },
    Sign(Result<SignReceipt, StoreError>),
}

#[derive(Debug, Clone)]
struct Toast {
    level: NoticeLevel,
    message: String,
    expires_at: Instant,
}

/// Where a pane was drawn last frame and which content rows each entity occupies.
#[derive(Debug, Default)]
struct PaneView {
    inner: Rect,
    scroll: u16,
    rows: Vec<RowSpan>,
    content_height: usize,
}

impl PaneView {
    fn layout(&mut self, inner: Rect, content: &PaneContent) {
        self.inner = inner;
        self.rows.clone_from(&content.rows);
        self.content_height = content.lines.len();
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        let max = self.content_height.saturating_sub(usize::from(self.inner.height));
        u16::try_from(max).unwrap_or(u16::MAX)
    }

    fn center_on(&mut self, idx: usize) {
        if let Some(target) = self.rows.get(idx).copied().filter(|row| row.height > 0) {
            self.scroll = centered_scroll(target, usize::from(self.inner.height), self.content_height);
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll).saturating_add(delta).max(0);
        self.scroll = u16::try_from(next).unwrap_or(u16::MAX).min(self.max_scroll());
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.inner.x
            && column < self.inner.x.saturating_add(self.inner.width)
            && row >= self.inner.y
            && row < self.inner.y.saturating_add(self.inner.height)
    }

    /// Index of the entity under a screen cell.
    fn hit(&self, column: u16, row: u16) -> Option<usize> {
        if !self.contains(column, row) {
            return None;
        }
        let content_row = usize::from(row - self.inner.y) + usize::from(self.scroll);
        self.rows.iter().position(|span| span.contains(content_row))
    }
}

struct App {
    review: Option<Review>,
    load_error: Option<String>,
    store: Arc<dyn SessionStore>,
    runtime: Handle,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    focus_rx: Option<watch::Receiver<Option<usize>>>,
    last_active: Option<NoteSpanId>,
    center_note: bool,
    follow_transcript: bool,
    transcript_view: PaneView,
    note_view: PaneView,
    theme: TuiTheme,
    toast: Option<Toast>,
    sign_prompt: bool,
    sign_in_flight: bool,
    should_quit: bool,
}

impl App {
    fn new(
        loaded: Result<Review, StoreError>,
        store: Arc<dyn SessionStore>,
        runtime: Handle,
        theme: TuiTheme,
    ) -> Self {
        let (review, load_error) = match loaded {
            Ok(review) => (Some(review), None),
            Err(err) if err.is_not_found() => (None, Some(format!("Session not found ({err})"))),
            Err(err) => (None, Some(format!("Could not load session: {err}"))),
        };
        let focus_rx = review.as_ref().map(Review::focus_signal);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            review,
            load_error,
            store,
            runtime,
            completions_tx,
            completions_rx,
            focus_rx,
            last_active: None,
            center_note: false,
            follow_transcript: false,
            transcript_view: PaneView::default(),
            note_view: PaneView::default(),
            theme,
            toast: None,
            sign_prompt: false,
            sign_in_flight: false,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Applies one key press. Returns `true` when the app should quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.sign_prompt {
            self.sign_prompt = false;
            if code == KeyCode::Char('y') {
                self.confirm_sign();
            } else {
                self.set_toast(NoticeLevel::Info, "Signing cancelled");
            }
            return false;
        }

        let editing = match self.review.as_ref() {
            Some(review) => review.edit().is_editing(),
            None => return matches!(code, KeyCode::Char('q') | KeyCode::Esc),
        };
        if editing {
            self.handle_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('S') => self.open_sign_prompt(),
            KeyCode::Char(ch) => {
                if let Some(key) = NavKey::from_char(ch) {
                    self.nav(key);
                }
            }
            KeyCode::Down => self.nav(NavKey::Down),
            KeyCode::Up => self.nav(NavKey::Up),
            KeyCode::Enter => self.nav(NavKey::Enter),
            KeyCode::Esc => self.nav(NavKey::Escape),
            KeyCode::PageDown => {
                let page = i32::from(self.transcript_view.inner.height / 2).max(1);
                self.transcript_view.scroll_by(page);
            }
            KeyCode::PageUp => {
                let page = i32::from(self.transcript_view.inner.height / 2).max(1);
                self.transcript_view.scroll_by(-page);
            }
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.save_draft(),
            KeyCode::Esc => {
                if let Some(review) = self.review.as_mut() {
                    review.cancel_editing();
                }
            }
            KeyCode::Backspace => {
                if let Some(review) = self.review.as_mut() {
                    review.pop_draft_char();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(review) = self.review.as_mut() {
                    review.push_draft_char(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.sign_prompt {
            return;
        }
        let Some(review) = self.review.as_ref() else {
            return;
        };
        let (column, row) = (mouse.column, mouse.row);
        let note_hit = self
            .note_view
            .hit(column, row)
            .and_then(|position| review.note_spans().get(position))
            .map(|span| span.id().clone());
        let segment_hit = self
            .transcript_view
            .hit(column, row)
            .and_then(|idx| review.segments().get(idx))
            .map(|segment| segment.id().clone());

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(span_id) = note_hit {
                    self.dispatch(ReviewEvent::ClickNoteSpan(span_id));
                } else if let Some(segment_id) = segment_hit {
                    self.dispatch(ReviewEvent::ClickSegment(segment_id));
                }
            }
            MouseEventKind::Moved => {
                self.dispatch(ReviewEvent::HoverNoteSpan(note_hit));
                self.dispatch(ReviewEvent::HoverSegment(segment_hit));
            }
            MouseEventKind::ScrollDown => self.scroll_pane_at(column, row, MOUSE_SCROLL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_pane_at(column, row, -MOUSE_SCROLL_ROWS),
            _ => {}
        }
    }

    fn scroll_pane_at(&mut self, column: u16, row: u16, delta: i32) {
        if self.note_view.contains(column, row) {
            self.note_view.scroll_by(delta);
        } else if self.transcript_view.contains(column, row) {
            self.transcript_view.scroll_by(delta);
        }
    }

    fn dispatch(&mut self, event: ReviewEvent) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        if let Err(err) = review.dispatch(event) {
            self.set_toast(NoticeLevel::Error, err.to_string());
        }
        self.collect_notices();
    }

    fn nav(&mut self, key: NavKey) {
        self.dispatch(ReviewEvent::Key(key));
    }

    fn start_edit(&mut self) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        let target = review
            .focused_span()
            .or_else(|| review.active_span())
            .map(|span| span.id().clone());
        let Some(span_id) = target else {
            self.set_toast(NoticeLevel::Info, "Select a statement to edit");
            return;
        };
        if let Err(err) = review.start_editing(&span_id) {
            self.set_toast(NoticeLevel::Error, edit_error_message(&err));
        }
    }

    fn save_draft(&mut self) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        match review.begin_save_draft() {
            Ok(SaveOutcome::Unchanged) => {}
            Ok(SaveOutcome::Pending(pending)) => self.spawn_save(pending),
            Err(err) => self.set_toast(NoticeLevel::Error, edit_error_message(&err)),
        }
    }

    fn spawn_save(&self, pending: PendingSave) {
        let store = Arc::clone(&self.store);
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let result = store.update_note_span_text(pending.span_id(), pending.text()).await;
            let _ = tx.send(Completion::Save { pending, result });
        });
    }

    fn open_sign_prompt(&mut self) {
        let Some(review) = self.review.as_ref() else {
            return;
        };
        if review.is_read_only() {
            self.set_toast(NoticeLevel::Info, "Note is already signed");
        } else if self.sign_in_flight {
            self.set_toast(NoticeLevel::Info, "Signing in progress");
        } else {
            self.sign_prompt = true;
        }
    }

    fn confirm_sign(&mut self) {
        let Some(review) = self.review.as_ref() else {
            return;
        };
        if let Err(err) = review.check_signable() {
            self.set_toast(NoticeLevel::Error, err.to_string());
            return;
        }
        let session_id = review.session().id().clone();
        let store = Arc::clone(&self.store);
        let tx = self.completions_tx.clone();
        self.sign_in_flight = true;
        self.runtime.spawn(async move {
            let result = store.sign_session(&session_id).await;
            let _ = tx.send(Completion::Sign(result));
        });
    }

    /// Settles every persistence result that arrived since the last frame.
    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        match completion {
            Completion::Save { pending, result } => {
                review.settle_save(&pending, result);
            }
            Completion::Sign(result) => {
                self.sign_in_flight = false;
                if let Err(err) = review.apply_sign(result) {
                    debug!(error = %err, "sign not applied");
                }
            }
        }
        self.collect_notices();
    }

    fn collect_notices(&mut self) {
        let Some(review) = self.review.as_mut() else {
            return;
        };
        if let Some(notice) = review.take_notices().pop() {
            self.set_toast(notice.level, notice.message);
        }
    }

    /// Turns focus-signal updates and newly activated spans into scroll requests for the next draw.
    fn observe_review(&mut self) {
        let Some(review) = self.review.as_ref() else {
            return;
        };
        if let Some(focus_rx) = self.focus_rx.as_mut() {
            if focus_rx.has_changed().unwrap_or(false) {
                let focus = *focus_rx.borrow_and_update();
                debug!(?focus, "note focus observed");
                self.center_note = true;
            }
        }
        let active = review.selection().active_note_span().cloned();
        if active != self.last_active {
            self.follow_transcript = active.is_some();
            self.last_active = active;
        }
    }

    fn set_toast(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= Instant::now()) {
            self.toast = None;
        }
    }
}

fn edit_error_message(err: &EditError) -> String {
    match err {
        EditError::ReadOnly => "Signed notes are read-only".to_owned(),
        EditError::EmptyText => "Note text must not be empty".to_owned(),
        EditError::UnknownSpan(_) => err.to_string(),
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
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
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
