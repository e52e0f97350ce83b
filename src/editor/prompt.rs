//! Confirmation prompts for destructive editor actions

use serde::{Deserialize, Serialize};

use crate::api::{Meeting, User};

/// When a destructive action arms the poll-suppression flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmPolicy {
    /// Only once the user confirms; cancelling leaves polling untouched
    #[default]
    ArmOnConfirm,
    /// As soon as the prompt opens, even if it is later cancelled
    ArmOnOpen,
}

/// The action waiting behind a prompt
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    RemoveHost(User),
    RemoveMeeting(Meeting),
    DeleteQueue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

/// A question put to the user before a destructive action runs
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    action: PendingAction,
    state: PromptState,
}

impl Confirmation {
    pub fn new(action: PendingAction) -> Self {
        Self { action, state: PromptState::Pending }
    }

    pub fn action(&self) -> &PendingAction {
        &self.action
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == PromptState::Pending
    }

    /// Move out of `Pending`. A prompt is answered once; later answers are ignored.
    pub fn decide(&mut self, decision: Decision) -> PromptState {
        if self.state == PromptState::Pending {
            self.state = match decision {
                Decision::Confirm => PromptState::Confirmed,
                Decision::Cancel => PromptState::Cancelled,
            };
        }
        self.state
    }

    pub fn title(&self) -> &'static str {
        match &self.action {
            PendingAction::RemoveHost(_) => "Remove Host?",
            PendingAction::RemoveMeeting(_) => "Remove Meeting?",
            PendingAction::DeleteQueue => "Delete Queue?",
        }
    }

    pub fn body(&self) -> String {
        match &self.action {
            PendingAction::RemoveHost(host) => {
                format!("Are you sure you want to remove host {}?", host.username)
            }
            PendingAction::RemoveMeeting(meeting) => match meeting.primary_attendee() {
                Some(attendee) => format!(
                    "Are you sure you want to remove your meeting with {} {}?",
                    attendee.first_name, attendee.last_name
                ),
                None => "Are you sure you want to remove this meeting?".to_string(),
            },
            PendingAction::DeleteQueue => {
                "Are you sure you want to permanently delete this queue?".to_string()
            }
        }
    }
}
