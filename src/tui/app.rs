//! Editor screen state and key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use ratatui::widgets::ListState;

use crate::api::{ManageQueue, Meeting, User, constants};
use crate::editor::{
    Confirmation, Decision, EditorError, PageStatus, QueueEditor, Resolution, RunOutcome,
};

use super::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hosts,
    Meetings,
}

/// What a text-entry modal submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    AddHost,
    AddAttendee,
    Rename,
    Description,
}

impl InputKind {
    pub fn title(&self) -> &'static str {
        match self {
            InputKind::AddHost => "Add Host (uniqname)",
            InputKind::AddAttendee => "Add Meeting (attendee uniqname)",
            InputKind::Rename => "Queue Name",
            InputKind::Description => "Queue Description",
        }
    }
}

pub enum Modal {
    Input { kind: InputKind, buffer: String },
    Confirm { confirmation: Confirmation, confirm_selected: bool },
}

/// How a background action ended, as far as the screen cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// The error is on the page banner already
    Failed,
    Rejected,
    Cancelled,
}

impl<T> From<RunOutcome<T>> for ActionOutcome {
    fn from(outcome: RunOutcome<T>) -> Self {
        match outcome {
            RunOutcome::Succeeded(_) => ActionOutcome::Done,
            RunOutcome::Failed(_) => ActionOutcome::Failed,
            RunOutcome::Rejected => ActionOutcome::Rejected,
        }
    }
}

impl From<Resolution> for ActionOutcome {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Cancelled => ActionOutcome::Cancelled,
            Resolution::Ran(outcome) => outcome.into(),
        }
    }
}

pub enum Msg {
    Key(KeyEvent),
    Finished { action: &'static str, outcome: ActionOutcome },
}

fn finished(action: &'static str) -> impl FnOnce(ActionOutcome) -> Msg {
    move |outcome| Msg::Finished { action, outcome }
}

pub struct EditorApp {
    editor: QueueEditor,
    base_url: String,
    pub(crate) pane: Pane,
    pub(crate) hosts: ListState,
    pub(crate) meetings: ListState,
    pub(crate) modal: Option<Modal>,
    pub(crate) notice: Option<String>,
    quit: bool,
}

impl EditorApp {
    pub fn new(editor: QueueEditor, base_url: impl Into<String>) -> Self {
        Self {
            editor,
            base_url: base_url.into(),
            pane: Pane::Hosts,
            hosts: ListState::default(),
            meetings: ListState::default(),
            modal: None,
            notice: None,
            quit: false,
        }
    }

    pub fn editor(&self) -> &QueueEditor {
        &self.editor
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn queue_url(&self) -> String {
        constants::queue_page_url(&self.base_url, self.editor.queue_id())
    }

    /// Quit was requested or the queue is gone
    pub fn should_quit(&self) -> bool {
        self.quit || self.editor.navigation().is_some()
    }

    pub fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Finished { action, outcome } => {
                debug!("{} finished: {:?}", action, outcome);
                match outcome {
                    ActionOutcome::Rejected => {
                        self.notice = Some("Another change is still in progress".to_string())
                    }
                    ActionOutcome::Done => self.notice = None,
                    ActionOutcome::Failed | ActionOutcome::Cancelled => {}
                }
                Command::None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Msg> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return Command::None;
        }

        match self.modal.take() {
            Some(Modal::Input { kind, buffer }) => self.handle_input_key(kind, buffer, key.code),
            Some(Modal::Confirm { confirmation, confirm_selected }) => {
                self.handle_confirm_key(confirmation, confirm_selected, key.code)
            }
            None => self.handle_screen_key(key.code),
        }
    }

    fn handle_screen_key(&mut self, code: KeyCode) -> Command<Msg> {
        let queue = self.editor.queue();
        self.sync_selection(queue.as_ref());

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                Command::None
            }
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Hosts => Pane::Meetings,
                    Pane::Meetings => Pane::Hosts,
                };
                Command::None
            }
            KeyCode::Up => {
                self.move_selection(queue.as_ref(), -1);
                Command::None
            }
            KeyCode::Down => {
                self.move_selection(queue.as_ref(), 1);
                Command::None
            }
            KeyCode::Char('r') => {
                let editor = self.editor.clone();
                Command::perform(
                    async move { ActionOutcome::from(editor.refresh().await) },
                    finished("refresh"),
                )
            }
            KeyCode::Char('a' | 'n' | 'e' | 'd' | 'D') | KeyCode::Delete
                if self.editing_blocked(queue.as_ref()) =>
            {
                Command::None
            }
            KeyCode::Char('a') => {
                let kind = match self.pane {
                    Pane::Hosts => InputKind::AddHost,
                    Pane::Meetings => InputKind::AddAttendee,
                };
                self.open_input(kind, String::new());
                Command::None
            }
            KeyCode::Char('n') => {
                let name = queue.map(|q| q.name).unwrap_or_default();
                self.open_input(InputKind::Rename, name);
                Command::None
            }
            KeyCode::Char('e') => {
                let description = queue.map(|q| q.description).unwrap_or_default();
                self.open_input(InputKind::Description, description);
                Command::None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                match self.pane {
                    Pane::Hosts => {
                        if let Some(host) = self.selected_host(queue.as_ref()) {
                            match self.editor.request_remove_host(&host) {
                                Ok(confirmation) => self.open_confirm(confirmation),
                                Err(e) => self.notice = Some(e.to_string()),
                            }
                        }
                    }
                    Pane::Meetings => {
                        if let Some(meeting) = self.selected_meeting(queue.as_ref()) {
                            let confirmation = self.editor.request_remove_meeting(&meeting);
                            self.open_confirm(confirmation);
                        }
                    }
                }
                Command::None
            }
            KeyCode::Char('D') => {
                let confirmation = self.editor.request_delete_queue();
                self.open_confirm(confirmation);
                Command::None
            }
            _ => Command::None,
        }
    }

    /// Editing needs a loaded queue and no mutation in flight
    fn editing_blocked(&mut self, queue: Option<&ManageQueue>) -> bool {
        if queue.is_none() {
            self.notice = Some(EditorError::NotLoaded.to_string());
            return true;
        }
        if self.editor.status().changing {
            self.notice = Some("Another change is still in progress".to_string());
            return true;
        }
        false
    }

    fn handle_input_key(&mut self, kind: InputKind, mut buffer: String, code: KeyCode) -> Command<Msg> {
        match code {
            KeyCode::Esc => Command::None,
            KeyCode::Enter => self.submit_input(kind, buffer),
            KeyCode::Backspace => {
                buffer.pop();
                self.modal = Some(Modal::Input { kind, buffer });
                Command::None
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.modal = Some(Modal::Input { kind, buffer });
                Command::None
            }
            _ => {
                self.modal = Some(Modal::Input { kind, buffer });
                Command::None
            }
        }
    }

    fn submit_input(&mut self, kind: InputKind, value: String) -> Command<Msg> {
        let editor = self.editor.clone();
        match kind {
            InputKind::AddHost => Command::perform(
                async move { ActionOutcome::from(editor.add_host(&value).await) },
                finished("add_host"),
            ),
            InputKind::AddAttendee => Command::perform(
                async move { ActionOutcome::from(editor.add_meeting(&value).await) },
                finished("add_meeting"),
            ),
            InputKind::Rename => Command::perform(
                async move { ActionOutcome::from(editor.change_name(&value).await) },
                finished("change_name"),
            ),
            InputKind::Description => Command::perform(
                async move { ActionOutcome::from(editor.change_description(&value).await) },
                finished("change_description"),
            ),
        }
    }

    fn handle_confirm_key(
        &mut self,
        confirmation: Confirmation,
        confirm_selected: bool,
        code: KeyCode,
    ) -> Command<Msg> {
        let decision = match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.modal = Some(Modal::Confirm { confirmation, confirm_selected: !confirm_selected });
                return Command::None;
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => Decision::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Decision::Cancel,
            KeyCode::Enter if confirm_selected => Decision::Confirm,
            KeyCode::Enter => Decision::Cancel,
            _ => {
                self.modal = Some(Modal::Confirm { confirmation, confirm_selected });
                return Command::None;
            }
        };

        let editor = self.editor.clone();
        Command::perform(
            async move { ActionOutcome::from(editor.resolve(confirmation, decision).await) },
            finished("confirmation"),
        )
    }

    fn open_input(&mut self, kind: InputKind, initial: String) {
        self.notice = None;
        self.modal = Some(Modal::Input { kind, buffer: initial });
    }

    fn open_confirm(&mut self, confirmation: Confirmation) {
        self.notice = None;
        // "No" is preselected
        self.modal = Some(Modal::Confirm { confirmation, confirm_selected: false });
    }

    fn pane_len(&self, queue: Option<&ManageQueue>) -> usize {
        match (self.pane, queue) {
            (Pane::Hosts, Some(q)) => q.hosts.len(),
            (Pane::Meetings, Some(q)) => q.meeting_set.len(),
            (_, None) => 0,
        }
    }

    fn move_selection(&mut self, queue: Option<&ManageQueue>, delta: isize) {
        let len = self.pane_len(queue);
        if len == 0 {
            return;
        }
        let state = match self.pane {
            Pane::Hosts => &mut self.hosts,
            Pane::Meetings => &mut self.meetings,
        };
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        state.select(Some(next));
    }

    /// Keep selections inside the lists after a refresh shrank them
    pub(crate) fn sync_selection(&mut self, queue: Option<&ManageQueue>) {
        let (hosts, meetings) = queue.map_or((0, 0), |q| (q.hosts.len(), q.meeting_set.len()));
        for (state, len) in [(&mut self.hosts, hosts), (&mut self.meetings, meetings)] {
            match (state.selected(), len) {
                (_, 0) => state.select(None),
                (None, _) => state.select(Some(0)),
                (Some(i), len) if i >= len => state.select(Some(len - 1)),
                _ => {}
            }
        }
    }

    fn selected_host(&self, queue: Option<&ManageQueue>) -> Option<User> {
        let index = self.hosts.selected()?;
        queue?.hosts.get(index).cloned()
    }

    fn selected_meeting(&self, queue: Option<&ManageQueue>) -> Option<Meeting> {
        let index = self.meetings.selected()?;
        queue?.meeting_set.get(index).cloned()
    }

    pub fn page_status(&self) -> PageStatus {
        self.editor.status()
    }
}
