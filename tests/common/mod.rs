//! Shared fixtures for integration tests
//!
//! `FakeApi` is an in-memory office-hours server behind the `QueueApi`
//! trait that records every call in `METHOD /path` form. `MockServer` is a
//! real HTTP listener on localhost for exercising the reqwest client.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use officehours::api::{
    ApiError, ApiResult, AttendingQueue, ManageQueue, Meeting, MeetingBackend, MeetingId, MyUser,
    QueueApi, QueueId, QueueView, User, UserId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

pub fn user(id: UserId, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        first_name: username.to_uppercase(),
        last_name: "Tester".to_string(),
    }
}

pub fn queue(id: QueueId, hosts: Vec<User>) -> ManageQueue {
    ManageQueue {
        id,
        name: "EECS 280 Office Hours".to_string(),
        description: "Bring your autograder output".to_string(),
        created_at: Utc.with_ymd_and_hms(2020, 9, 1, 12, 0, 0).unwrap(),
        hosts,
        meeting_set: Vec::new(),
    }
}

pub fn meeting(id: MeetingId, attendee: User) -> Meeting {
    Meeting {
        id,
        attendees: vec![attendee],
        backend: MeetingBackend::None,
        started_at: None,
    }
}

#[derive(Default)]
pub struct FakeState {
    pub queue: Option<ManageQueue>,
    /// Serve the queue in its attending form, as for a non-host
    pub attending: bool,
    pub users: Vec<User>,
    pub calls: Vec<String>,
    /// Failures returned once, keyed by `QueueApi` method name
    pub failures: HashMap<&'static str, ApiError>,
    pub next_meeting_id: MeetingId,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn new(queue: ManageQueue, users: Vec<User>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                queue: Some(queue),
                users,
                next_meeting_id: 100,
                ..FakeState::default()
            }),
            gate: Mutex::new(None),
        })
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn count(&self, call: &str) -> usize {
        self.with_state(|s| s.calls.iter().filter(|c| c.as_str() == call).count())
    }

    pub fn clear_calls(&self) {
        self.with_state(|s| s.calls.clear());
    }

    pub fn fail_next(&self, method: &'static str, error: ApiError) {
        self.with_state(|s| s.failures.insert(method, error));
    }

    pub fn current_queue(&self) -> ManageQueue {
        self.with_state(|s| s.queue.clone().expect("queue was deleted"))
    }

    /// Make mutating calls wait until the returned `Notify` is signalled
    pub fn hold_mutations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    fn record(&self, method: &'static str, call: String) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.remove(method) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn wait_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(notify) = gate {
            notify.notified().await;
        }
    }

    fn find_user(&self, user_id: UserId) -> User {
        self.with_state(|s| s.users.iter().find(|u| u.id == user_id).cloned())
            .unwrap_or_else(|| user(user_id, "unknown"))
    }
}

#[async_trait]
impl QueueApi for FakeApi {
    async fn get_users(&self) -> ApiResult<Vec<User>> {
        self.record("get_users", "GET /api/users/".into())?;
        Ok(self.with_state(|s| s.users.clone()))
    }

    async fn get_my_user(&self, user_id: UserId) -> ApiResult<MyUser> {
        self.record("get_my_user", format!("GET /api/users/{}/", user_id))?;
        let hosted = self.with_state(|s| s.queue.clone().into_iter().collect());
        Ok(MyUser { user: self.find_user(user_id), my_queue: None, hosted_queues: hosted })
    }

    async fn get_queues(&self) -> ApiResult<Vec<ManageQueue>> {
        self.record("get_queues", "GET /api/queues/".into())?;
        Ok(self.with_state(|s| s.queue.clone().into_iter().collect()))
    }

    async fn get_queue(&self, queue_id: QueueId) -> ApiResult<QueueView> {
        self.record("get_queue", format!("GET /api/queues/{}/", queue_id))?;
        self.with_state(|s| match (&s.queue, s.attending) {
            (Some(q), false) => Ok(QueueView::Manage(q.clone())),
            (Some(q), true) => Ok(QueueView::Attending(AttendingQueue {
                id: q.id,
                name: q.name.clone(),
                description: q.description.clone(),
                created_at: q.created_at,
                hosts: q.hosts.clone(),
                line_length: Some(q.meeting_set.len() as u32),
                line_place: None,
            })),
            (None, _) => Err(ApiError::Http { status: 404, status_text: "Not Found".into() }),
        })
    }

    async fn create_queue(&self, name: &str) -> ApiResult<ManageQueue> {
        self.record("create_queue", "POST /api/queues/".into())?;
        let mut created = queue(99, Vec::new());
        created.name = name.to_string();
        Ok(created)
    }

    async fn delete_queue(&self, queue_id: QueueId) -> ApiResult<()> {
        self.wait_gate().await;
        self.record("delete_queue", format!("DELETE /api/queues/{}/", queue_id))?;
        self.with_state(|s| s.queue = None);
        Ok(())
    }

    async fn search_queues(&self, term: &str) -> ApiResult<Vec<AttendingQueue>> {
        self.record("search_queues", format!("GET /api/queues_search/?search={}", term))?;
        Ok(Vec::new())
    }

    async fn change_queue_name(&self, queue_id: QueueId, name: &str) -> ApiResult<ManageQueue> {
        self.wait_gate().await;
        self.record("change_queue_name", format!("PATCH /api/queues/{}/", queue_id))?;
        self.with_state(|s| {
            let q = s.queue.as_mut().expect("queue exists");
            q.name = name.to_string();
            Ok(q.clone())
        })
    }

    async fn change_queue_description(
        &self,
        queue_id: QueueId,
        description: &str,
    ) -> ApiResult<ManageQueue> {
        self.wait_gate().await;
        self.record("change_queue_description", format!("PATCH /api/queues/{}/", queue_id))?;
        self.with_state(|s| {
            let q = s.queue.as_mut().expect("queue exists");
            q.description = description.to_string();
            Ok(q.clone())
        })
    }

    async fn add_host(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()> {
        self.wait_gate().await;
        self.record("add_host", format!("POST /api/queues/{}/hosts/{}/", queue_id, user_id))?;
        let host = self.find_user(user_id);
        self.with_state(|s| {
            if let Some(q) = s.queue.as_mut() {
                q.hosts.push(host);
            }
        });
        Ok(())
    }

    async fn remove_host(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()> {
        self.wait_gate().await;
        self.record("remove_host", format!("DELETE /api/queues/{}/hosts/{}/", queue_id, user_id))?;
        self.with_state(|s| {
            if let Some(q) = s.queue.as_mut() {
                q.hosts.retain(|h| h.id != user_id);
            }
        });
        Ok(())
    }

    async fn add_meeting(&self, _queue_id: QueueId, user_id: UserId) -> ApiResult<()> {
        self.wait_gate().await;
        self.record("add_meeting", "POST /api/meetings/".into())?;
        let attendee = self.find_user(user_id);
        self.with_state(|s| {
            let id = s.next_meeting_id;
            s.next_meeting_id += 1;
            if let Some(q) = s.queue.as_mut() {
                q.meeting_set.push(meeting(id, attendee));
            }
        });
        Ok(())
    }

    async fn remove_meeting(&self, meeting_id: MeetingId) -> ApiResult<()> {
        self.wait_gate().await;
        self.record("remove_meeting", format!("DELETE /api/meetings/{}", meeting_id))?;
        self.with_state(|s| {
            if let Some(q) = s.queue.as_mut() {
                q.meeting_set.retain(|m| m.id != meeting_id);
            }
        });
        Ok(())
    }
}

/// A request as received by [`MockServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Lowercased header names
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

struct Scripted {
    status: u16,
    reason: &'static str,
    body: String,
}

/// Minimal HTTP/1.1 server answering scripted responses in order.
/// Unscripted requests get `200 OK` with an empty JSON array.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<Scripted>>>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responses = Arc::new(Mutex::new(VecDeque::new()));

        let recorded = requests.clone();
        let scripted = responses.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                let recorded = recorded.clone();
                let scripted = scripted.clone();
                tokio::spawn(async move {
                    let Some(request) = read_request(&mut socket).await else { return };
                    recorded.lock().unwrap().push(request);

                    let response = scripted.lock().unwrap().pop_front().unwrap_or(Scripted {
                        status: 200,
                        reason: "OK",
                        body: "[]".to_string(),
                    });
                    let raw = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        response.status,
                        response.reason,
                        response.body.len(),
                        response.body
                    );
                    let _ = socket.write_all(raw.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { base_url: format!("http://{}", addr), requests, responses }
    }

    pub fn respond(&self, status: u16, reason: &'static str, body: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Scripted { status, reason, body: body.into() });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request received")
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = (body_start + content_length).min(buf.len());
    let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

    Some(RecordedRequest { method, path, headers, body })
}
