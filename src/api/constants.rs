//! Endpoint paths and header names for the office-hours REST API

/// Base path shared by every REST endpoint
pub const API_BASE_PATH: &str = "/api";

/// Path the browser is sent to after a queue is deleted
pub const MANAGE_PATH: &str = "/manage";

/// Standard headers for office-hours requests
pub mod headers {
    /// Content type for JSON request bodies
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Anti-forgery header checked by the server on mutating requests
    pub const CSRF_TOKEN: &str = "X-CSRFToken";

    /// Cookie carrying the CSRF secret (must match the header)
    pub const CSRF_COOKIE: &str = "csrftoken";

    /// Cookie carrying the authenticated session
    pub const SESSION_COOKIE: &str = "sessionid";
}

/// HTTP methods for operations
pub mod methods {
    pub const GET: &str = "GET";
    pub const POST: &str = "POST";
    pub const PATCH: &str = "PATCH";
    pub const DELETE: &str = "DELETE";
}

/// `/api/users/`
pub fn users_endpoint(base_url: &str) -> String {
    format!("{}{}/users/", base_url, API_BASE_PATH)
}

/// `/api/users/{id}/`
pub fn user_endpoint(base_url: &str, user_id: u64) -> String {
    format!("{}{}/users/{}/", base_url, API_BASE_PATH, user_id)
}

/// `/api/queues/`
pub fn queues_endpoint(base_url: &str) -> String {
    format!("{}{}/queues/", base_url, API_BASE_PATH)
}

/// `/api/queues/{id}/`
pub fn queue_endpoint(base_url: &str, queue_id: u64) -> String {
    format!("{}{}/queues/{}/", base_url, API_BASE_PATH, queue_id)
}

/// `/api/queues/{id}/hosts/{user_id}/`
pub fn queue_host_endpoint(base_url: &str, queue_id: u64, user_id: u64) -> String {
    format!("{}{}/queues/{}/hosts/{}/", base_url, API_BASE_PATH, queue_id, user_id)
}

/// `/api/meetings/`
pub fn meetings_endpoint(base_url: &str) -> String {
    format!("{}{}/meetings/", base_url, API_BASE_PATH)
}

/// `/api/meetings/{id}` (the server routes this one without a trailing slash)
pub fn meeting_endpoint(base_url: &str, meeting_id: u64) -> String {
    format!("{}{}/meetings/{}", base_url, API_BASE_PATH, meeting_id)
}

/// `/api/queues_search/?search={term}` with the term percent-encoded
pub fn queue_search_endpoint(base_url: &str, term: &str) -> String {
    format!(
        "{}{}/queues_search/?search={}",
        base_url,
        API_BASE_PATH,
        urlencoding::encode(term)
    )
}

/// Public visitor page of a queue
pub fn queue_page_url(base_url: &str, queue_id: u64) -> String {
    format!("{}/queue/{}", base_url, queue_id)
}
