//! HTTP-level tests for the REST client against a local mock server

mod common;

use common::MockServer;
use officehours::api::{
    ApiError, ClientConfig, MeetingBackend, OfficeHoursClient, PageContext, QueueApi, QueueView,
};
use serde_json::{Value, json};
use std::time::Duration;

fn client(server: &MockServer) -> OfficeHoursClient {
    let context = PageContext::new(Some("tok123".into()), Some("sess456".into()));
    OfficeHoursClient::new(server.base_url.clone(), context).unwrap()
}

fn queue_json() -> Value {
    json!({
        "id": 5,
        "name": "EECS 280",
        "description": "Project help",
        "created_at": "2020-09-01T12:00:00Z",
        "hosts": [{"id": 7, "username": "hostone", "first_name": "Host", "last_name": "One"}],
        "meeting_set": [{
            "id": 11,
            "attendees": [{"id": 42, "username": "abc123", "first_name": "A", "last_name": "B"}],
            "backend_type": "bluejeans",
            "backend_metadata": {"meeting_id": "123", "meeting_url": "https://bluejeans.com/123"}
        }]
    })
}

/// GET requests carry the session cookie but no anti-forgery header
#[tokio::test]
async fn test_get_omits_csrf_header() {
    let server = MockServer::start().await;
    let client = client(&server);

    client.get_users().await.unwrap();

    let request = server.last_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/users/");
    assert_eq!(request.header("X-CSRFToken"), None);
    assert_eq!(request.header("Cookie"), Some("sessionid=sess456; csrftoken=tok123"));
}

/// POST, PATCH and DELETE all carry the token; POST/PATCH declare JSON
#[tokio::test]
async fn test_mutations_carry_csrf_header() {
    let server = MockServer::start().await;
    let client = client(&server);

    client.add_host(5, 42).await.unwrap();
    let add = server.last_request();
    assert_eq!(add.method, "POST");
    assert_eq!(add.path, "/api/queues/5/hosts/42/");
    assert_eq!(add.header("X-CSRFToken"), Some("tok123"));
    assert_eq!(add.header("Content-Type"), Some("application/json"));

    server.respond(200, "OK", queue_json().to_string());
    client.change_queue_name(5, "New name").await.unwrap();
    let patch = server.last_request();
    assert_eq!(patch.method, "PATCH");
    assert_eq!(patch.path, "/api/queues/5/");
    assert_eq!(patch.header("X-CSRFToken"), Some("tok123"));
    assert_eq!(serde_json::from_str::<Value>(&patch.body).unwrap(), json!({"name": "New name"}));

    client.remove_meeting(11).await.unwrap();
    let delete = server.last_request();
    assert_eq!(delete.method, "DELETE");
    assert_eq!(delete.path, "/api/meetings/11");
    assert_eq!(delete.header("X-CSRFToken"), Some("tok123"));
    assert_eq!(delete.header("Content-Type"), None);
}

/// An empty token is treated as no token at all
#[tokio::test]
async fn test_empty_token_is_not_sent() {
    let server = MockServer::start().await;
    let client =
        OfficeHoursClient::new(server.base_url.clone(), PageContext::new(Some(String::new()), None))
            .unwrap();

    client.delete_queue(5).await.unwrap();

    let request = server.last_request();
    assert_eq!(request.header("X-CSRFToken"), None);
    assert_eq!(request.header("Cookie"), None);
}

/// Meeting bodies name the queue and the attendee list
#[tokio::test]
async fn test_add_meeting_body() {
    let server = MockServer::start().await;
    client(&server).add_meeting(5, 42).await.unwrap();

    let request = server.last_request();
    assert_eq!(request.path, "/api/meetings/");
    assert_eq!(
        serde_json::from_str::<Value>(&request.body).unwrap(),
        json!({"queue": 5, "attendee_ids": [42]})
    );
}

/// Search terms are percent-encoded into the query string
#[tokio::test]
async fn test_search_term_is_encoded() {
    let server = MockServer::start().await;
    client(&server).search_queues("eecs 280&more").await.unwrap();

    assert_eq!(server.last_request().path, "/api/queues_search/?search=eecs%20280%26more");
}

/// Field messages of a 400 are flattened in key order
#[tokio::test]
async fn test_bad_request_is_flattened() {
    let server = MockServer::start().await;
    server.respond(
        400,
        "Bad Request",
        r#"{"name": ["too short"], "description": ["required"]}"#,
    );

    let err = client(&server).change_queue_name(5, "x").await.unwrap_err();

    assert_eq!(err, ApiError::BadRequest("too short\nrequired".into()));
    assert_eq!(err.to_string(), "too short\nrequired");
}

/// A 400 without a JSON object falls back to the status text
#[tokio::test]
async fn test_bad_request_without_fields() {
    let server = MockServer::start().await;
    server.respond(400, "Bad Request", "oops");

    let err = client(&server).delete_queue(5).await.unwrap_err();

    assert_eq!(err, ApiError::BadRequest("Bad Request".into()));
}

/// Other error statuses only report their status text
#[tokio::test]
async fn test_other_errors_report_status_text() {
    let server = MockServer::start().await;
    server.respond(403, "Forbidden", r#"{"detail": "CSRF Failed"}"#);

    let err = client(&server).add_host(5, 42).await.unwrap_err();

    assert_eq!(err, ApiError::Http { status: 403, status_text: "Forbidden".into() });
    assert_eq!(err.to_string(), "Forbidden");
}

/// The queue endpoint decodes into the host view, backend included
#[tokio::test]
async fn test_get_queue_decodes_manage_view() {
    let server = MockServer::start().await;
    server.respond(200, "OK", queue_json().to_string());

    let view = client(&server).get_queue(5).await.unwrap();

    let QueueView::Manage(queue) = view else { panic!("expected the host view") };
    assert_eq!(queue.hosts[0].username, "hostone");
    let meeting = &queue.meeting_set[0];
    assert!(matches!(meeting.backend, MeetingBackend::Bluejeans(_)));
    assert_eq!(meeting.backend.join_url(), Some("https://bluejeans.com/123"));
}

/// A body of the wrong shape is a decode error, not a panic
#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let server = MockServer::start().await;
    server.respond(200, "OK", r#"{"not": "a list"}"#);

    let err = client(&server).get_users().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

/// A server that never answers hits the request deadline
#[tokio::test]
async fn test_request_deadline() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ClientConfig { request_timeout: Some(Duration::from_millis(200)), ..ClientConfig::default() };
    let client =
        OfficeHoursClient::with_config(format!("http://{}", addr), PageContext::default(), config)
            .unwrap();

    let err = client.get_users().await.unwrap_err();

    assert_eq!(err, ApiError::Timeout);
}
