//! Structured request logging with correlation tracking
//!
//! Every request gets a correlation id so the request, its response and
//! its outcome can be matched up in the log file.

use serde_json::json;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use log::{debug, info, warn};

/// Request logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub request_logging: bool,
    /// Requests slower than this get a warning
    pub slow_request_threshold: Duration,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            request_logging: true,
            slow_request_threshold: Duration::from_secs(3),
        }
    }
}

/// Structured logger for HTTP calls made by the client
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    config: LoggingConfig,
}

/// Context for a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    /// Client operation name (add_host, get_queue, ...)
    pub operation: String,
    pub method: String,
    pub url: String,
    pub start_time: Instant,
}

impl RequestContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl RequestLogger {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Start tracking a request and log it with sanitized headers
    pub fn start_request(
        &self,
        operation: &str,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> RequestContext {
        let context = RequestContext {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            operation: operation.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            start_time: Instant::now(),
        };

        if self.config.request_logging {
            let log_data = json!({
                "event": "http_request",
                "correlation_id": context.correlation_id,
                "operation": context.operation,
                "method": method,
                "url": url,
                "headers": sanitize_headers(headers),
                "timestamp": chrono::Utc::now().to_rfc3339()
            });

            debug!("HTTP Request: {}", log_data);
        }

        context
    }

    /// Log the response status of a request
    pub fn log_response(&self, context: &RequestContext, status_code: u16) {
        if !self.config.request_logging {
            return;
        }

        let duration = context.elapsed();
        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "status_code": status_code,
            "duration_ms": duration.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if status_code >= 400 {
            warn!("HTTP Response (Error): {}", log_data);
        } else {
            info!("HTTP Response: {}", log_data);
        }

        if duration > self.config.slow_request_threshold {
            warn!(
                "Slow request {} {} ({}): {}ms",
                context.method,
                context.url,
                context.correlation_id,
                duration.as_millis()
            );
        }
    }

    /// Log a request that never produced a response
    pub fn log_failure(&self, context: &RequestContext, error: &str) {
        let log_data = json!({
            "event": "http_failure",
            "correlation_id": context.correlation_id,
            "operation": context.operation,
            "method": context.method,
            "url": context.url,
            "error": error,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        warn!("HTTP Failure: {}", log_data);
    }
}

/// Redact credentials before headers hit the log file
pub fn sanitize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    let mut sanitized = HashMap::new();

    for (key, value) in headers {
        let key_lower = key.to_lowercase();
        if key_lower.contains("csrf") || key_lower.contains("cookie") || key_lower.contains("authorization") {
            sanitized.insert(key.clone(), "[REDACTED]".to_string());
        } else {
            sanitized.insert(key.clone(), value.clone());
        }
    }

    sanitized
}
