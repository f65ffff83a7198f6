//! The whole shell driven through `handle_event`, without a terminal.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

use crate::core::models::TurnRole;
use crate::core::results::{ResultsStatus, ResultsTab};
use crate::core::upload::{UploadPolicy, UploadStatus};
use crate::tests::mocks::{
    accepting_uploads, failing_retriever, replies_with, retriever_with_samples, test_services,
    MockReplyGenerator, MockRetriever, MockUploadProcessor, UploadLog,
};
use crate::tui::app::AppState;
use crate::tui::clipboard::MemoryClipboard;
use crate::tui::events::{Action, AppEvent, Focus, NotificationLevel};
use crate::tui::views::InputMode;

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        app.handle_event(key(KeyCode::Char(c)));
    }
}

fn build(
    retriever: MockRetriever,
    replies: MockReplyGenerator,
    uploads: MockUploadProcessor,
) -> (AppState, UploadLog) {
    let t = test_services(retriever, replies, uploads);
    let app = AppState::new(t.event_rx, t.services, UploadPolicy::default());
    (app, t.uploads)
}

fn default_app() -> (AppState, UploadLog) {
    build(
        retriever_with_samples(),
        replies_with("Grounded answer"),
        accepting_uploads(),
    )
}

async fn settle(app: &mut AppState, ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    app.drain_events();
}

#[tokio::test(start_paused = true)]
async fn test_search_then_discuss() {
    let (mut app, _) = default_app();
    assert_eq!(app.focus, Focus::Search);

    app.handle_event(key(KeyCode::Char('i')));
    assert_eq!(app.input_mode(), InputMode::Insert);
    type_text(&mut app, "ocean warming");
    app.handle_event(key(KeyCode::Enter));

    assert!(app.search.gate().is_searching());
    assert_eq!(app.focus, Focus::Results);
    assert_eq!(app.results.results().status(), &ResultsStatus::Loading);
    assert_eq!(app.search.gate().history().next(), Some("ocean warming"));

    settle(&mut app, 1600).await;
    assert!(!app.search.gate().is_searching());
    assert_eq!(app.results.results().status(), &ResultsStatus::Ready);
    assert_eq!(app.results.results().sources().len(), 3);
    assert_eq!(app.results.results().footer(), "Generated from 3 sources");

    // Open the discussion and ask a follow-up.
    app.handle_event(key(KeyCode::Char('d')));
    assert_eq!(app.results.results().tab(), ResultsTab::Discussion);
    app.handle_event(key(KeyCode::Char('i')));
    type_text(&mut app, "which source is strongest?");
    app.handle_event(key(KeyCode::Enter));

    let discussion = app.results.results().discussion();
    assert!(discussion.is_awaiting_reply());
    assert_eq!(discussion.len(), 3);

    settle(&mut app, 10).await;
    let discussion = app.results.results().discussion();
    assert!(!discussion.is_awaiting_reply());
    let last = discussion.turns().last().unwrap();
    assert_eq!(last.role, TurnRole::Assistant);
    assert_eq!(last.text, "Grounded answer");
}

#[tokio::test(start_paused = true)]
async fn test_blank_search_never_reaches_retriever() {
    let mut retriever = MockRetriever::new();
    retriever.expect_search().times(0);
    let (mut app, _) = build(retriever, replies_with("unused"), accepting_uploads());

    app.handle_event(key(KeyCode::Char('i')));
    type_text(&mut app, "   ");
    app.handle_event(key(KeyCode::Enter));
    settle(&mut app, 2000).await;

    assert!(!app.search.gate().is_searching());
    assert_eq!(app.focus, Focus::Search);
    assert_eq!(app.results.results().status(), &ResultsStatus::Empty);
}

#[tokio::test(start_paused = true)]
async fn test_second_search_ignored_during_display_window() {
    let (mut app, _) = default_app();
    app.handle_event(key(KeyCode::Char('i')));
    type_text(&mut app, "first");
    app.handle_event(key(KeyCode::Enter));

    app.handle_action(Action::FocusSearch);
    app.handle_event(key(KeyCode::Char('i')));
    app.handle_event(AppEvent::Input(Event::Key(KeyEvent::new(
        KeyCode::Char('u'),
        KeyModifiers::CONTROL,
    ))));
    type_text(&mut app, "second");
    app.handle_event(key(KeyCode::Enter));

    assert_eq!(app.results.results().query(), "first");
    assert_eq!(app.search.gate().history().next(), Some("first"));
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_notifies() {
    let (mut app, _) = build(
        failing_retriever(),
        replies_with("unused"),
        accepting_uploads(),
    );
    app.handle_event(key(KeyCode::Char('i')));
    type_text(&mut app, "anything");
    app.handle_event(key(KeyCode::Enter));

    settle(&mut app, 1600).await;
    assert!(matches!(
        app.results.results().status(),
        ResultsStatus::Failed(_)
    ));
    assert!(app
        .notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Error));
}

#[tokio::test(start_paused = true)]
async fn test_history_rerun_starts_search() {
    let (mut app, _) = default_app();
    app.handle_action(Action::FocusHistory);
    app.handle_event(key(KeyCode::Char('j')));
    app.handle_event(key(KeyCode::Enter));

    assert_eq!(app.focus, Focus::Results);
    assert_eq!(
        app.results.results().query(),
        "sustainable development goals"
    );
    assert_eq!(
        app.search.gate().history().next(),
        Some("sustainable development goals")
    );
    assert_eq!(app.search.gate().history_len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_pdf_uploads_and_resets() {
    let (mut app, uploads) = default_app();
    app.handle_action(Action::FocusUpload);
    app.handle_event(AppEvent::Input(Event::Paste(
        "/nonexistent/paper.pdf /nonexistent/notes.txt".into(),
    )));
    assert_eq!(app.upload.task().status(), UploadStatus::Uploading);

    settle(&mut app, 50).await;
    assert_eq!(app.upload.task().status(), UploadStatus::Success);
    assert_eq!(app.upload.task().progress(), 100);
    {
        let calls = uploads.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].name, "paper.pdf");
    }
    assert!(app
        .notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Success));

    settle(&mut app, 2000).await;
    assert_eq!(app.upload.task().status(), UploadStatus::Idle);
    assert!(app.upload.task().files().is_empty());
    assert_eq!(uploads.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_non_pdf_drop_warns_and_stays_idle() {
    let (mut app, uploads) = default_app();
    app.handle_action(Action::FocusUpload);
    app.handle_event(AppEvent::Input(Event::Paste("/nonexistent/notes.txt".into())));

    assert_eq!(app.upload.task().status(), UploadStatus::Idle);
    assert!(app
        .notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Warning));
    settle(&mut app, 50).await;
    assert!(uploads.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_copy_latest_reply() {
    let t = test_services(
        retriever_with_samples(),
        replies_with("Grounded answer"),
        accepting_uploads(),
    );
    let clipboard: std::sync::Arc<MemoryClipboard> = t.clipboard.clone();
    let mut app = AppState::new(t.event_rx, t.services, UploadPolicy::default());

    app.handle_event(key(KeyCode::Char('i')));
    type_text(&mut app, "coral");
    app.handle_event(key(KeyCode::Enter));
    settle(&mut app, 1600).await;
    app.handle_event(key(KeyCode::Char('d')));

    // Only the research summary so far.
    app.handle_event(key(KeyCode::Char('y')));
    let summary = clipboard.last().unwrap();
    assert!(summary.contains("coral"));

    app.handle_event(key(KeyCode::Char('i')));
    type_text(&mut app, "why?");
    app.handle_event(key(KeyCode::Enter));
    app.handle_event(key(KeyCode::Esc));

    // Placeholder is never copied.
    app.handle_event(key(KeyCode::Char('y')));
    assert_eq!(clipboard.last(), Some(summary));

    settle(&mut app, 10).await;
    app.handle_event(key(KeyCode::Char('y')));
    assert_eq!(clipboard.last().as_deref(), Some("Grounded answer"));
    assert_eq!(clipboard.len(), 3);
    settle(&mut app, 1).await;
    assert!(app
        .notifications
        .iter()
        .any(|n| n.message == "Copied to clipboard"));
}

#[tokio::test]
async fn test_help_modal_swallows_keys() {
    let (mut app, _) = default_app();
    app.handle_event(key(KeyCode::Char('?')));
    assert!(app.show_help);

    app.handle_event(key(KeyCode::Char('q')));
    assert!(app.running);

    app.handle_event(key(KeyCode::Esc));
    assert!(!app.show_help);

    app.handle_event(key(KeyCode::Char('q')));
    assert!(!app.running);
}

#[tokio::test]
async fn test_tab_cycles_views() {
    let (mut app, _) = default_app();
    app.handle_event(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Results);
    app.handle_event(AppEvent::Input(Event::Key(KeyEvent::new(
        KeyCode::BackTab,
        KeyModifiers::SHIFT,
    ))));
    assert_eq!(app.focus, Focus::Search);
    app.handle_event(key(KeyCode::Char('4')));
    assert_eq!(app.focus, Focus::Upload);
}

#[tokio::test]
async fn test_notifications_dedup_and_cap() {
    let (mut app, _) = default_app();
    for i in 0..5 {
        app.push_notification(format!("note {i}"), NotificationLevel::Info);
    }
    app.push_notification("note 4".into(), NotificationLevel::Info);
    assert_eq!(app.notifications.len(), 3);
    assert_eq!(app.notifications[0].message, "note 2");
}

#[tokio::test]
async fn test_renders_every_view() {
    let (mut app, _) = default_app();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

    for focus in Focus::ALL {
        app.focus = focus;
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("RESEARCH"));
    }

    app.show_help = true;
    terminal.draw(|frame| app.render(frame)).unwrap();
    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(text.contains("Keybindings"));
}
