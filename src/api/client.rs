use super::constants::{self, headers, methods};
use super::context::PageContext;
use super::error::{ApiError, flatten_field_errors};
use super::logging::{LoggingConfig, RequestLogger};
use super::models::{
    AddMeetingRequest, AttendingQueue, CreateQueueRequest, ManageQueue, MeetingId, MyUser,
    QueueId, QueueView, User, UserId,
};
use super::service::{ApiResult, QueueApi};
use async_trait::async_trait;
use log::error;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for a whole request; `None` waits forever
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            logging: LoggingConfig::default(),
        }
    }
}

/// REST client for the office-hours queue service
#[derive(Clone)]
pub struct OfficeHoursClient {
    base_url: String,
    http_client: reqwest::Client,
    context: PageContext,
    logger: RequestLogger,
}

impl OfficeHoursClient {
    pub fn new(base_url: impl Into<String>, context: PageContext) -> ApiResult<Self> {
        Self::with_config(base_url, context, ClientConfig::default())
    }

    pub fn with_config(
        base_url: impl Into<String>,
        context: PageContext,
        config: ClientConfig,
    ) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("officehours-cli/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            context,
            logger: RequestLogger::new(config.logging),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request. Mutating methods carry the anti-forgery header,
    /// POST/PATCH also declare a JSON body.
    async fn send(
        &self,
        operation: &str,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> ApiResult<Response> {
        let mut sent_headers = HashMap::new();
        let mut request = self.http_client.request(method.clone(), &url);

        if let Some(cookie) = self.context.cookie_header() {
            request = request.header(reqwest::header::COOKIE, cookie.as_str());
            sent_headers.insert("Cookie".to_string(), cookie);
        }

        if method != Method::GET {
            if let Some(token) = self.context.csrf_header() {
                request = request.header(headers::CSRF_TOKEN, token);
                sent_headers.insert(headers::CSRF_TOKEN.to_string(), token.to_string());
            }
        }

        if method == Method::POST || method == Method::PATCH {
            request = request.header(reqwest::header::CONTENT_TYPE, headers::CONTENT_TYPE_JSON);
            sent_headers.insert("Content-Type".to_string(), headers::CONTENT_TYPE_JSON.to_string());
        }

        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let context = self.logger.start_request(operation, method.as_str(), &url, &sent_headers);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger.log_failure(&context, &e.to_string());
                return Err(ApiError::from_reqwest_error(&e));
            }
        };
        self.logger.log_response(&context, response.status().as_u16());

        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> ApiResult<T> {
        let response = self.send(operation, method, url, body).await?;
        let text = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{}: {}", operation, e)))
    }

    async fn send_empty(
        &self,
        operation: &str,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> ApiResult<()> {
        self.send(operation, method, url, body).await.map(|_| ())
    }
}

/// Turn non-2xx responses into errors. A 400 carries field messages that
/// are flattened; anything else only reports its status text.
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
    let body = response.text().await.unwrap_or_default();

    if status == StatusCode::BAD_REQUEST {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| flatten_field_errors(&v))
            .unwrap_or(status_text);
        return Err(ApiError::BadRequest(message));
    }

    error!("{} {}: {}", status.as_u16(), status_text, body);
    Err(ApiError::Http { status: status.as_u16(), status_text })
}

#[async_trait]
impl QueueApi for OfficeHoursClient {
    async fn get_users(&self) -> ApiResult<Vec<User>> {
        let url = constants::users_endpoint(&self.base_url);
        self.send_json("get_users", Method::GET, url, None).await
    }

    async fn get_my_user(&self, user_id: UserId) -> ApiResult<MyUser> {
        let url = constants::user_endpoint(&self.base_url, user_id);
        self.send_json("get_my_user", Method::GET, url, None).await
    }

    async fn get_queues(&self) -> ApiResult<Vec<ManageQueue>> {
        let url = constants::queues_endpoint(&self.base_url);
        self.send_json("get_queues", Method::GET, url, None).await
    }

    async fn get_queue(&self, queue_id: QueueId) -> ApiResult<QueueView> {
        let url = constants::queue_endpoint(&self.base_url, queue_id);
        self.send_json("get_queue", Method::GET, url, None).await
    }

    async fn create_queue(&self, name: &str) -> ApiResult<ManageQueue> {
        let url = constants::queues_endpoint(&self.base_url);
        // The server insists on host_ids even though it adds the caller itself
        let body = CreateQueueRequest { name: name.to_string(), host_ids: Vec::new() };
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send_json("create_queue", Method::POST, url, Some(body)).await
    }

    async fn delete_queue(&self, queue_id: QueueId) -> ApiResult<()> {
        let url = constants::queue_endpoint(&self.base_url, queue_id);
        self.send_empty("delete_queue", Method::DELETE, url, None).await
    }

    async fn search_queues(&self, term: &str) -> ApiResult<Vec<AttendingQueue>> {
        let url = constants::queue_search_endpoint(&self.base_url, term);
        self.send_json("search_queues", Method::GET, url, None).await
    }

    async fn change_queue_name(&self, queue_id: QueueId, name: &str) -> ApiResult<ManageQueue> {
        let url = constants::queue_endpoint(&self.base_url, queue_id);
        self.send_json("change_queue_name", Method::PATCH, url, Some(json!({ "name": name })))
            .await
    }

    async fn change_queue_description(
        &self,
        queue_id: QueueId,
        description: &str,
    ) -> ApiResult<ManageQueue> {
        let url = constants::queue_endpoint(&self.base_url, queue_id);
        let body = json!({ "description": description });
        self.send_json("change_queue_description", Method::PATCH, url, Some(body)).await
    }

    async fn add_host(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()> {
        let url = constants::queue_host_endpoint(&self.base_url, queue_id, user_id);
        self.send_empty("add_host", Method::POST, url, None).await
    }

    async fn remove_host(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()> {
        let url = constants::queue_host_endpoint(&self.base_url, queue_id, user_id);
        self.send_empty("remove_host", Method::DELETE, url, None).await
    }

    async fn add_meeting(&self, queue_id: QueueId, user_id: UserId) -> ApiResult<()> {
        let url = constants::meetings_endpoint(&self.base_url);
        let body = AddMeetingRequest { queue: queue_id, attendee_ids: vec![user_id] };
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send_empty("add_meeting", Method::POST, url, Some(body)).await
    }

    async fn remove_meeting(&self, meeting_id: MeetingId) -> ApiResult<()> {
        let url = constants::meeting_endpoint(&self.base_url, meeting_id);
        self.send_empty("remove_meeting", Method::DELETE, url, None).await
    }
}
