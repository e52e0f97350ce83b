//! Credentials a browser page would carry implicitly

use super::constants::headers;

/// Session and anti-forgery credentials handed to the client at construction.
///
/// In the browser these come from the page markup and the cookie jar; here
/// they are explicit so every request can be traced back to one context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub csrf_token: Option<String>,
    pub session_id: Option<String>,
}

impl PageContext {
    pub fn new(csrf_token: Option<String>, session_id: Option<String>) -> Self {
        Self { csrf_token, session_id }
    }

    /// Value for the anti-forgery header on POST/PATCH/DELETE
    pub fn csrf_header(&self) -> Option<&str> {
        self.csrf_token.as_deref().filter(|t| !t.is_empty())
    }

    /// `Cookie` header value, if any credential is set.
    ///
    /// The CSRF token is mirrored into its cookie since the server compares
    /// header and cookie.
    pub fn cookie_header(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(session) = self.session_id.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("{}={}", headers::SESSION_COOKIE, session));
        }
        if let Some(token) = self.csrf_header() {
            parts.push(format!("{}={}", headers::CSRF_COOKIE, token));
        }

        if parts.is_empty() { None } else { Some(parts.join("; ")) }
    }
}
