use crate::api::ApiError;

use super::controller::ControllerStatus;

/// One controller per remote operation the editor page performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    FetchQueue,
    FetchUsers,
    RemoveHost,
    AddHost,
    RemoveMeeting,
    AddMeeting,
    ChangeName,
    ChangeDescription,
    DeleteQueue,
}

impl ControllerKind {
    /// Order in which errors compete for the page banner
    pub const PRIORITY: [ControllerKind; 9] = [
        ControllerKind::FetchQueue,
        ControllerKind::FetchUsers,
        ControllerKind::RemoveHost,
        ControllerKind::AddHost,
        ControllerKind::RemoveMeeting,
        ControllerKind::AddMeeting,
        ControllerKind::ChangeName,
        ControllerKind::ChangeDescription,
        ControllerKind::DeleteQueue,
    ];

    pub fn is_mutation(&self) -> bool {
        !matches!(self, ControllerKind::FetchQueue | ControllerKind::FetchUsers)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ControllerKind::FetchQueue => "fetch_queue",
            ControllerKind::FetchUsers => "fetch_users",
            ControllerKind::RemoveHost => "remove_host",
            ControllerKind::AddHost => "add_host",
            ControllerKind::RemoveMeeting => "remove_meeting",
            ControllerKind::AddMeeting => "add_meeting",
            ControllerKind::ChangeName => "change_name",
            ControllerKind::ChangeDescription => "change_description",
            ControllerKind::DeleteQueue => "delete_queue",
        }
    }
}

/// Loading and error state of the whole editor page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStatus {
    /// Any controller is running
    pub loading: bool,
    /// A mutation is running; editing actions are disabled meanwhile
    pub changing: bool,
    /// First error in [`ControllerKind::PRIORITY`] order
    pub error: Option<(ControllerKind, ApiError)>,
}

impl PageStatus {
    /// Fold controller statuses, given in priority order
    pub fn aggregate(statuses: &[(ControllerKind, ControllerStatus)]) -> Self {
        let loading = statuses.iter().any(|(_, s)| s.loading);
        let changing = statuses.iter().any(|(kind, s)| kind.is_mutation() && s.loading);
        let error = statuses
            .iter()
            .find_map(|(kind, s)| s.error.clone().map(|e| (*kind, e)));

        Self { loading, changing, error }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|(_, e)| e.to_string())
    }
}
