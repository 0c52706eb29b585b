//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and carries out the
//! `Effect`s that `update()` returns.
//!
//! This is the only module that knows about ratatui, crossterm and the
//! tokio tasks that talk to the backend.
//!
//! ## Effects
//!
//! Each effect runs as its own tokio task holding an `Arc<dyn DocumentBackend>`.
//! When the request completes the task sends one `Action` back over an mpsc
//! channel, which the loop drains between frames.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (answer pending, upload running, picker loading): draws
//!   every ~80ms so spinners move.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resizes or
//!   finished background work.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ApiError, DocumentBackend, DocumentId, HttpBackend, PdfUpload};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::picker::PickerStatus;
use crate::core::state::{App, Overlay};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    DocumentPickerState, InputBar, InputEvent, MessageListState, PickerEvent, UploadEvent,
    UploadModalState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_bar: InputBar,
    pub upload_modal: UploadModalState,
    pub picker: DocumentPickerState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_bar: InputBar::new(),
            upload_modal: UploadModalState::new(),
            picker: DocumentPickerState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart from Enter.
        // Terminals that don't speak it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Apply an action and keep the presentation state in step with the result.
///
/// Switching documents throws away the old conversation's scroll position,
/// and opening the upload dialog starts with an empty path.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action) -> Vec<Effect> {
    let before = app.session.document().map(|d| d.id.clone());
    let upload_was_open = matches!(app.overlay, Overlay::Upload(_));
    let picker_was_open = matches!(app.overlay, Overlay::Picker(_));

    let effects = update(app, action);

    if app.session.document().map(|d| &d.id) != before.as_ref() {
        tui.message_list = MessageListState::new();
    }
    match &app.overlay {
        Overlay::Upload(dialog) => {
            if !upload_was_open {
                tui.upload_modal = UploadModalState::new();
            }
            tui.upload_modal.locked = !dialog.accepts_input();
        }
        Overlay::Picker(picker) => {
            if !picker_was_open {
                tui.picker = DocumentPickerState::new();
            }
            tui.picker.sync(picker.documents().len());
        }
        Overlay::None => {}
    }

    effects
}

/// Route one terminal event to whoever owns it and apply the resulting
/// actions. Returns the effects to perform.
fn route_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Vec<Effect> {
    match event {
        TuiEvent::Resize => return vec![],
        TuiEvent::ForceQuit => return dispatch(app, tui, Action::Quit),
        _ => {}
    }

    // Shortcuts only work while no modal is open.
    if matches!(app.overlay, Overlay::None) {
        match event {
            TuiEvent::OpenUpload => return dispatch(app, tui, Action::OpenUpload),
            TuiEvent::OpenPicker => return dispatch(app, tui, Action::OpenPicker),
            _ => {}
        }
    }

    match &app.overlay {
        Overlay::Upload(_) => {
            let action = match tui.upload_modal.handle_event(event) {
                Some(UploadEvent::Edited) => Action::UploadPathEdited,
                Some(UploadEvent::Submit(path)) => Action::UploadRequested(path),
                Some(UploadEvent::Dismiss) => Action::CloseUpload,
                None => return vec![],
            };
            return dispatch(app, tui, action);
        }
        Overlay::Picker(picker) => {
            let action = match tui.picker.handle_event(event) {
                Some(PickerEvent::Choose(index)) => match &picker.status {
                    PickerStatus::Loaded(docs) => match docs.get(index) {
                        Some(doc) => Action::SelectDocument(doc.clone()),
                        None => return vec![],
                    },
                    _ => return vec![],
                },
                Some(PickerEvent::Dismiss) => Action::ClosePicker,
                None => return vec![],
            };
            return dispatch(app, tui, action);
        }
        Overlay::None => {}
    }

    if matches!(
        event,
        TuiEvent::ScrollUp | TuiEvent::ScrollDown | TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown
    ) {
        tui.message_list.handle_event(event);
        return vec![];
    }

    if app.session.document().is_none() {
        return vec![];
    }
    tui.input_bar.disabled = app.session.is_pending();
    match tui.input_bar.handle_event(event) {
        Some(InputEvent::Submit(text)) => dispatch(app, tui, Action::Submit(text)),
        Some(InputEvent::ContentChanged) | None => vec![],
    }
}

/// Run one effect against the backend and produce the action that reports
/// its outcome. `Quit` has nothing to run.
async fn perform(effect: Effect, backend: Arc<dyn DocumentBackend>, list_limit: u32) -> Option<Action> {
    match effect {
        Effect::Quit => None,
        Effect::Ask {
            ticket,
            document_id,
            question,
            history,
        } => {
            let started = Instant::now();
            let result = backend
                .ask_question(&document_id, &question, &history)
                .await;
            debug!(
                "Ask finished: ticket={}, ok={}, {}ms",
                ticket,
                result.is_ok(),
                started.elapsed().as_millis()
            );
            Some(Action::AnswerReceived { ticket, result })
        }
        Effect::FetchDocuments(target) => {
            let result = backend.list_documents(0, list_limit).await;
            Some(Action::DocumentsLoaded { target, result })
        }
        Effect::FetchDocument(id) => Some(Action::DocumentResolved(backend.get_document(&id).await)),
        Effect::Upload { ticket, path } => {
            let result = match read_upload(&path).await {
                Ok(upload) => backend.upload_document(upload).await,
                Err(e) => Err(e),
            };
            Some(Action::UploadFinished { ticket, result })
        }
        Effect::CloseUploadAfter { ticket, delay } => {
            tokio::time::sleep(delay).await;
            Some(Action::UploadAutoClose { ticket })
        }
    }
}

async fn read_upload(path: &Path) -> Result<PdfUpload, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Io(format!("{}: {}", path.display(), e)))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    info!("Read {} ({} bytes) for upload", filename, bytes.len());
    Ok(PdfUpload { filename, bytes })
}

/// Spawn a task per effect. Returns true if one of them asks to quit.
fn spawn_effects(
    effects: Vec<Effect>,
    backend: &Arc<dyn DocumentBackend>,
    list_limit: u32,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let mut quit = false;
    for effect in effects {
        if effect == Effect::Quit {
            quit = true;
            continue;
        }
        debug!("Spawning effect: {:?}", effect);
        let backend = Arc::clone(backend);
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(action) = perform(effect, backend, list_limit).await
                && tx.send(action).is_err()
            {
                warn!("Dropping background result: receiver closed");
            }
        });
    }
    quit
}

/// Whether anything on screen is spinning.
fn is_animating(app: &App) -> bool {
    app.session.is_pending()
        || match &app.overlay {
            Overlay::Upload(dialog) => dialog.is_uploading(),
            Overlay::Picker(picker) => matches!(picker.status, PickerStatus::Loading),
            Overlay::None => false,
        }
}

pub fn run(
    config: ResolvedConfig,
    initial_document: Option<DocumentId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend: Arc<dyn DocumentBackend> =
        Arc::new(HttpBackend::new(&config.base_url, config.request_timeout)?);
    let list_limit = config.list_limit;
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let effects = dispatch(
        &mut app,
        &mut tui,
        Action::Started {
            document: initial_document,
        },
    );
    spawn_effects(effects, &backend, list_limit, &tx);

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'main: loop {
        let animating = is_animating(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain everything queued before the next draw.
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effects = route_event(&mut app, &mut tui, &event);
            if spawn_effects(effects, &backend, list_limit, &tx) {
                break 'main;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effects = dispatch(&mut app, &mut tui, action);
            if spawn_effects(effects, &backend, list_limit, &tx) {
                break 'main;
            }
        }
    }

    info!("docchat shutting down");
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Document;
    use crate::core::action::FetchTarget;
    use crate::core::state::FALLBACK_ANSWER;
    use crate::core::upload::UploadStatus;
    use crate::test_support::{FakeBackend, active_app, test_app};
    use std::io::Write;
    use std::path::PathBuf;

    fn type_text(app: &mut App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            route_event(app, tui, &TuiEvent::InputChar(c));
        }
    }

    fn backend(docs: Vec<Document>, answer: Option<&str>) -> Arc<FakeBackend> {
        Arc::new(FakeBackend::new(docs, answer))
    }

    #[test]
    fn enter_submits_question_from_input_bar() {
        let mut app = active_app("1", "a.pdf");
        let mut tui = TuiState::new();
        type_text(&mut app, &mut tui, "Why?");

        let effects = route_event(&mut app, &mut tui, &TuiEvent::Submit);
        assert!(matches!(&effects[..], [Effect::Ask { question, .. }] if question == "Why?"));
        assert_eq!(tui.input_bar.text(), "");
        assert!(app.session.is_pending());
    }

    #[test]
    fn typing_ignored_without_document() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        type_text(&mut app, &mut tui, "hello");
        assert_eq!(tui.input_bar.text(), "");
    }

    #[test]
    fn shortcuts_open_overlays_and_esc_closes() {
        let mut app = test_app();
        let mut tui = TuiState::new();

        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        assert!(matches!(app.overlay, Overlay::Upload(_)));
        // Picker shortcut is inert while the upload dialog is up.
        route_event(&mut app, &mut tui, &TuiEvent::OpenPicker);
        assert!(matches!(app.overlay, Overlay::Upload(_)));
        route_event(&mut app, &mut tui, &TuiEvent::Escape);
        assert!(matches!(app.overlay, Overlay::None));

        let effects = route_event(&mut app, &mut tui, &TuiEvent::OpenPicker);
        assert!(matches!(
            effects[..],
            [Effect::FetchDocuments(FetchTarget::Picker { .. })]
        ));
        route_event(&mut app, &mut tui, &TuiEvent::Escape);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[test]
    fn reopening_upload_clears_previous_path() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        type_text(&mut app, &mut tui, "old.pdf");
        assert_eq!(tui.upload_modal.path, "old.pdf");

        route_event(&mut app, &mut tui, &TuiEvent::Escape);
        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        assert_eq!(tui.upload_modal.path, "");
    }

    #[test]
    fn non_pdf_path_shows_notice_without_effect() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        type_text(&mut app, &mut tui, "notes.txt");

        let effects = route_event(&mut app, &mut tui, &TuiEvent::Submit);
        assert!(effects.is_empty());
        match &app.overlay {
            Overlay::Upload(dialog) => assert!(matches!(dialog.status, UploadStatus::Notice(_))),
            _ => panic!("upload dialog should stay open"),
        }
    }

    #[test]
    fn picker_choice_activates_document_and_resets_scroll() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, &TuiEvent::OpenPicker);
        let ticket = match &app.overlay {
            Overlay::Picker(p) => p.ticket,
            _ => panic!("picker should be open"),
        };
        dispatch(
            &mut app,
            &mut tui,
            Action::DocumentsLoaded {
                target: FetchTarget::Picker { ticket },
                result: Ok(vec![Document::new("1", "a.pdf"), Document::new("2", "b.pdf")]),
            },
        );
        tui.message_list.stick_to_bottom = false;

        route_event(&mut app, &mut tui, &TuiEvent::CursorDown);
        route_event(&mut app, &mut tui, &TuiEvent::Submit);

        assert_eq!(app.session.document().map(|d| d.id.as_str()), Some("2"));
        assert!(matches!(app.overlay, Overlay::None));
        assert!(tui.message_list.stick_to_bottom);
    }

    #[test]
    fn upload_dialog_locks_while_uploading() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        dispatch(&mut app, &mut tui, Action::UploadRequested("/tmp/a.pdf".to_string()));
        assert!(tui.upload_modal.locked);

        route_event(&mut app, &mut tui, &TuiEvent::InputChar('x'));
        assert_eq!(tui.upload_modal.path, "");
    }

    #[test]
    fn reopened_upload_dialog_ignores_earlier_request() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        let effects = dispatch(
            &mut app,
            &mut tui,
            Action::UploadRequested("/tmp/a.pdf".to_string()),
        );
        let Some(Effect::Upload { ticket, .. }) = effects.into_iter().next() else {
            panic!("expected upload effect");
        };
        route_event(&mut app, &mut tui, &TuiEvent::Escape);
        route_event(&mut app, &mut tui, &TuiEvent::OpenUpload);
        route_event(&mut app, &mut tui, &TuiEvent::InputChar('b'));

        dispatch(
            &mut app,
            &mut tui,
            Action::UploadFinished {
                ticket,
                result: Err(ApiError::Api {
                    status: 500,
                    detail: None,
                }),
            },
        );
        assert!(!tui.upload_modal.locked);
        assert_eq!(tui.upload_modal.path, "b");
        match &app.overlay {
            Overlay::Upload(dialog) => assert_eq!(dialog.status, UploadStatus::Idle),
            other => panic!("expected upload dialog, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn perform_ask_reports_answer_with_ticket() {
        let fake = backend(vec![], Some("42"));
        let effect = Effect::Ask {
            ticket: 3,
            document_id: DocumentId::new("1"),
            question: "Answer?".to_string(),
            history: vec![],
        };

        match perform(effect, fake.clone(), 10).await {
            Some(Action::AnswerReceived { ticket, result }) => {
                assert_eq!(ticket, 3);
                assert_eq!(result.unwrap(), "42");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(fake.asked.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_ask_becomes_fallback_message() {
        let fake = backend(vec![], None);
        let mut app = active_app("1", "a.pdf");
        let mut tui = TuiState::new();
        let effects = dispatch(&mut app, &mut tui, Action::Submit("Q".to_string()));

        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(perform(effect, fake.clone(), 10).await);
        }
        for action in actions {
            dispatch(&mut app, &mut tui, action);
        }

        let messages = app.session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, FALLBACK_ANSWER);
        assert!(!app.session.is_pending());
    }

    #[tokio::test]
    async fn perform_fetch_documents_respects_limit() {
        let docs = (1..=15)
            .map(|i| Document::new(i.to_string(), format!("{i}.pdf")))
            .collect();
        let fake = backend(docs, None);
        match perform(Effect::FetchDocuments(FetchTarget::Session), fake, 10).await {
            Some(Action::DocumentsLoaded { result, .. }) => assert_eq!(result.unwrap().len(), 10),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn perform_fetch_unknown_document_fails() {
        let fake = backend(vec![Document::new("1", "a.pdf")], None);
        match perform(Effect::FetchDocument(DocumentId::new("9")), fake, 10).await {
            Some(Action::DocumentResolved(Err(e))) => {
                assert_eq!(e.detail(), Some("Document not found"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn perform_upload_reads_file_and_sends_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let fake = backend(vec![], None);
        match perform(Effect::Upload { ticket: 4, path }, fake.clone(), 10).await {
            Some(Action::UploadFinished {
                ticket: 4,
                result: Ok(doc),
            }) => assert_eq!(doc.original_filename, "report.pdf"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            fake.uploaded.lock().unwrap()[0],
            ("report.pdf".to_string(), 13)
        );
    }

    #[tokio::test]
    async fn perform_upload_missing_file_is_io_error() {
        let fake = backend(vec![], None);
        let path = PathBuf::from("/definitely/not/here.pdf");
        match perform(Effect::Upload { ticket: 1, path }, fake.clone(), 10).await {
            Some(Action::UploadFinished {
                result: Err(ApiError::Io(_)),
                ..
            }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(fake.uploaded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_timer_fires_auto_close() {
        let fake = backend(vec![], None);
        let effect = Effect::CloseUploadAfter {
            ticket: 2,
            delay: Duration::from_millis(1),
        };
        let action = perform(effect, fake, 10).await;
        assert!(matches!(action, Some(Action::UploadAutoClose { ticket: 2 })));
    }

    #[test]
    fn animating_only_while_waiting() {
        let mut app = active_app("1", "a.pdf");
        assert!(!is_animating(&app));
        update(&mut app, Action::Submit("Q".to_string()));
        assert!(is_animating(&app));
    }
}
