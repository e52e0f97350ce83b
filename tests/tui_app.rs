//! Key handling of the terminal editor, driven without a terminal

mod common;

use common::{FakeApi, queue, user};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use officehours::editor::{EditorSettings, Navigation, QueueEditor};
use officehours::tui::app::{ActionOutcome, EditorApp, InputKind, Modal, Msg, Pane};
use officehours::tui::Command;
use std::sync::Arc;

fn key(code: KeyCode) -> Msg {
    Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

async fn app_with_hosts(usernames: &[(u64, &str)]) -> (Arc<FakeApi>, EditorApp) {
    let hosts: Vec<_> = usernames.iter().map(|(id, name)| user(*id, name)).collect();
    let mut users = hosts.clone();
    users.push(user(42, "abc123"));
    let api = FakeApi::new(queue(5, hosts), users);
    let editor = QueueEditor::new(api.clone(), 5, EditorSettings::default());
    editor.load().await;
    api.clear_calls();
    (api, EditorApp::new(editor, "https://oh.example.edu"))
}

/// Run a command the way the runtime would and feed its message back
async fn drive(app: &mut EditorApp, command: Command<Msg>) -> Option<ActionOutcome> {
    match command {
        Command::None => None,
        Command::Perform(future) => {
            let msg = future.await;
            let outcome = match &msg {
                Msg::Finished { outcome, .. } => Some(*outcome),
                Msg::Key(_) => None,
            };
            assert!(app.update(msg).is_none());
            outcome
        }
    }
}

async fn type_text(app: &mut EditorApp, text: &str) {
    for c in text.chars() {
        let command = app.update(key(KeyCode::Char(c)));
        assert!(command.is_none());
    }
}

#[tokio::test]
async fn test_tab_switches_panes() {
    let (_api, mut app) = app_with_hosts(&[(7, "hostone")]).await;
    assert_eq!(app.pane(), Pane::Hosts);

    app.update(key(KeyCode::Tab));
    assert_eq!(app.pane(), Pane::Meetings);

    app.update(key(KeyCode::Tab));
    assert_eq!(app.pane(), Pane::Hosts);
}

#[tokio::test]
async fn test_queue_url_uses_base_url() {
    let (_api, app) = app_with_hosts(&[(7, "hostone")]).await;
    assert_eq!(app.queue_url(), "https://oh.example.edu/queue/5");
}

/// Removing the only host shows a notice instead of a prompt
#[tokio::test]
async fn test_remove_sole_host_is_refused() {
    let (api, mut app) = app_with_hosts(&[(7, "hostone")]).await;

    let command = app.update(key(KeyCode::Char('d')));

    assert!(command.is_none());
    assert!(app.modal().is_none());
    assert_eq!(app.notice(), Some("The last host of a queue cannot be removed"));
    assert!(api.calls().is_empty());
}

/// `a` opens the add-host input; Enter submits it to the editor
#[tokio::test]
async fn test_add_host_through_input_modal() {
    let (api, mut app) = app_with_hosts(&[(7, "hostone")]).await;

    app.update(key(KeyCode::Char('a')));
    assert!(matches!(app.modal(), Some(Modal::Input { kind: InputKind::AddHost, .. })));

    type_text(&mut app, "abc12").await;
    app.update(key(KeyCode::Backspace));
    type_text(&mut app, "23").await;
    let command = app.update(key(KeyCode::Enter));
    assert!(app.modal().is_none());

    let outcome = drive(&mut app, command).await;

    assert_eq!(outcome, Some(ActionOutcome::Done));
    assert_eq!(api.count("POST /api/queues/5/hosts/42/"), 1);
    assert!(app.editor().queue().unwrap().is_host(42));
}

/// Escape closes an input without doing anything
#[tokio::test]
async fn test_escape_discards_input() {
    let (api, mut app) = app_with_hosts(&[(7, "hostone")]).await;

    app.update(key(KeyCode::Char('n')));
    let Some(Modal::Input { buffer, .. }) = app.modal() else { panic!("rename input expected") };
    assert_eq!(buffer, "EECS 280 Office Hours");

    assert!(app.update(key(KeyCode::Esc)).is_none());
    assert!(app.modal().is_none());
    assert!(!app.should_quit());
    assert!(api.calls().is_empty());
}

/// The confirmation modal defaults to No
#[tokio::test]
async fn test_remove_host_prompt_defaults_to_no() {
    let (api, mut app) = app_with_hosts(&[(7, "hostone"), (8, "hosttwo")]).await;

    app.update(key(KeyCode::Char('d')));
    assert!(matches!(app.modal(), Some(Modal::Confirm { confirm_selected: false, .. })));

    let command = app.update(key(KeyCode::Enter));
    let outcome = drive(&mut app, command).await;

    assert_eq!(outcome, Some(ActionOutcome::Cancelled));
    assert!(api.calls().is_empty());
}

/// `y` confirms the selected host's removal
#[tokio::test]
async fn test_remove_selected_host() {
    let (api, mut app) = app_with_hosts(&[(7, "hostone"), (8, "hosttwo")]).await;

    app.update(key(KeyCode::Down));
    app.update(key(KeyCode::Char('d')));
    let Some(Modal::Confirm { confirmation, .. }) = app.modal() else { panic!("prompt expected") };
    assert_eq!(confirmation.body(), "Are you sure you want to remove host hosttwo?");

    let command = app.update(key(KeyCode::Char('y')));
    drive(&mut app, command).await;

    assert_eq!(api.count("DELETE /api/queues/5/hosts/8/"), 1);
    assert_eq!(app.editor().queue().unwrap().hosts.len(), 1);
}

/// Deleting the queue ends the editor with navigation to the manage page
#[tokio::test]
async fn test_delete_queue_quits_editor() {
    let (api, mut app) = app_with_hosts(&[(7, "hostone")]).await;

    app.update(key(KeyCode::Char('D')));
    app.update(key(KeyCode::Left));
    assert!(matches!(app.modal(), Some(Modal::Confirm { confirm_selected: true, .. })));

    let command = app.update(key(KeyCode::Enter));
    drive(&mut app, command).await;

    assert_eq!(api.count("DELETE /api/queues/5/"), 1);
    assert!(app.should_quit());
    assert_eq!(app.editor().navigation(), Some(Navigation::Manage));
}

#[tokio::test]
async fn test_quit_keys() {
    let (_api, mut app) = app_with_hosts(&[(7, "hostone")]).await;
    assert!(!app.should_quit());

    app.update(key(KeyCode::Char('q')));
    assert!(app.should_quit());
}

/// A rejected action leaves a notice behind
#[tokio::test]
async fn test_rejected_action_sets_notice() {
    let (_api, mut app) = app_with_hosts(&[(7, "hostone")]).await;

    app.update(Msg::Finished { action: "add_host", outcome: ActionOutcome::Rejected });

    assert_eq!(app.notice(), Some("Another change is still in progress"));
}
