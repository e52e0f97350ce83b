//! Resource types returned by the office-hours API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type UserId = u64;
pub type QueueId = u64;
pub type MeetingId = u64;

/// Minimal user reference, as embedded in queues and meetings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// "First Last (username)", or just the username when no name is set
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            format!("{} ({})", full, self.username)
        }
    }
}

/// The signed-in user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub my_queue: Option<AttendingQueue>,
    #[serde(default)]
    pub hosted_queues: Vec<ManageQueue>,
}

/// BlueJeans meeting details attached by the server
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BluejeansMetadata {
    #[serde(default)]
    pub meeting_id: Option<String>,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// Meeting platform behind a meeting, keyed by the wire `backend_type`
#[derive(Debug, Clone, PartialEq)]
pub enum MeetingBackend {
    /// In-person or no platform configured
    None,
    Bluejeans(BluejeansMetadata),
    /// A backend this client does not know, kept verbatim
    Other { backend_type: String, metadata: Value },
}

impl MeetingBackend {
    pub const BLUEJEANS: &'static str = "bluejeans";

    pub fn backend_type(&self) -> Option<&str> {
        match self {
            MeetingBackend::None => None,
            MeetingBackend::Bluejeans(_) => Some(Self::BLUEJEANS),
            MeetingBackend::Other { backend_type, .. } => Some(backend_type),
        }
    }

    /// URL a host can open to start the meeting, if the platform provides one
    pub fn join_url(&self) -> Option<&str> {
        match self {
            MeetingBackend::None => None,
            MeetingBackend::Bluejeans(metadata) => metadata.meeting_url.as_deref(),
            MeetingBackend::Other { .. } => None,
        }
    }

    fn from_wire(backend_type: Option<String>, metadata: Option<Value>) -> Self {
        let metadata = metadata.unwrap_or(Value::Null);
        match backend_type.as_deref() {
            None | Some("") => MeetingBackend::None,
            Some(Self::BLUEJEANS) => {
                // Metadata is cleared server-side when a meeting is removed
                let parsed = if metadata.is_null() {
                    Ok(BluejeansMetadata::default())
                } else {
                    serde_json::from_value(metadata.clone())
                };
                match parsed {
                    Ok(parsed) => MeetingBackend::Bluejeans(parsed),
                    Err(_) => MeetingBackend::Other {
                        backend_type: Self::BLUEJEANS.to_string(),
                        metadata,
                    },
                }
            }
            Some(other) => MeetingBackend::Other {
                backend_type: other.to_string(),
                metadata,
            },
        }
    }

    fn to_wire(&self) -> (Option<String>, Option<Value>) {
        match self {
            MeetingBackend::None => (None, None),
            MeetingBackend::Bluejeans(metadata) => (
                Some(Self::BLUEJEANS.to_string()),
                serde_json::to_value(metadata).ok(),
            ),
            MeetingBackend::Other { backend_type, metadata } => {
                (Some(backend_type.clone()), Some(metadata.clone()))
            }
        }
    }
}

/// A queue entry: who is waiting and on which platform they will meet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireMeeting", into = "WireMeeting")]
pub struct Meeting {
    pub id: MeetingId,
    pub attendees: Vec<User>,
    pub backend: MeetingBackend,
    pub started_at: Option<DateTime<Utc>>,
}

impl Meeting {
    /// The attendee who joined the queue (index 0 by convention)
    pub fn primary_attendee(&self) -> Option<&User> {
        self.attendees.first()
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct WireMeeting {
    id: MeetingId,
    #[serde(default)]
    attendees: Vec<User>,
    #[serde(default)]
    backend_type: Option<String>,
    #[serde(default)]
    backend_metadata: Option<Value>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
}

impl From<WireMeeting> for Meeting {
    fn from(wire: WireMeeting) -> Self {
        Self {
            id: wire.id,
            attendees: wire.attendees,
            backend: MeetingBackend::from_wire(wire.backend_type, wire.backend_metadata),
            started_at: wire.started_at,
        }
    }
}

impl From<Meeting> for WireMeeting {
    fn from(meeting: Meeting) -> Self {
        let (backend_type, backend_metadata) = meeting.backend.to_wire();
        Self {
            id: meeting.id,
            attendees: meeting.attendees,
            backend_type,
            backend_metadata,
            started_at: meeting.started_at,
        }
    }
}

/// A queue as seen by one of its hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManageQueue {
    pub id: QueueId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub hosts: Vec<User>,
    pub meeting_set: Vec<Meeting>,
}

impl ManageQueue {
    pub fn is_host(&self, user_id: UserId) -> bool {
        self.hosts.iter().any(|h| h.id == user_id)
    }

    /// The sole remaining host cannot be removed
    pub fn can_remove_host(&self) -> bool {
        self.hosts.len() > 1
    }
}

/// A queue as seen by a visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendingQueue {
    pub id: QueueId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub hosts: Vec<User>,
    #[serde(default)]
    pub line_length: Option<u32>,
    #[serde(default)]
    pub line_place: Option<i64>,
}

/// `GET /api/queues/{id}/` answers with the manage form for hosts and the
/// attending form for everyone else. The manage form is tried first since
/// only it carries `meeting_set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueView {
    Manage(ManageQueue),
    Attending(AttendingQueue),
}

impl QueueView {
    pub fn id(&self) -> QueueId {
        match self {
            QueueView::Manage(q) => q.id,
            QueueView::Attending(q) => q.id,
        }
    }

    pub fn into_manage(self) -> Option<ManageQueue> {
        match self {
            QueueView::Manage(q) => Some(q),
            QueueView::Attending(_) => None,
        }
    }
}

/// Body of `POST /api/queues/`
#[derive(Debug, Clone, Serialize)]
pub struct CreateQueueRequest {
    pub name: String,
    pub host_ids: Vec<UserId>,
}

/// Body of `POST /api/meetings/`
#[derive(Debug, Clone, Serialize)]
pub struct AddMeetingRequest {
    pub queue: QueueId,
    pub attendee_ids: Vec<UserId>,
}
