//! Minimal HTTP/1.1 request parsing and response encoding.
//!
//! The server answers one request per connection and never reads a body,
//! so only the request line matters; headers are scanned past and dropped.

use std::fmt;

use url::Url;

use crate::error::{ServerError, ServerResult};

/// Content type of every response body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Response status codes the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl StatusCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Parses a request head (request line plus headers).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BadRequest`] if the request line is malformed.
    pub fn parse(head: &str) -> ServerResult<Self> {
        let line = head.lines().next().unwrap_or_default();
        let mut parts = line.split_whitespace();

        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ServerError::bad_request(format!(
                "malformed request line '{}'",
                line
            )));
        };

        if !version.starts_with("HTTP/") {
            return Err(ServerError::bad_request(format!(
                "unsupported protocol '{}'",
                version
            )));
        }
        if !target.starts_with('/') {
            return Err(ServerError::bad_request(format!(
                "request target must be a path, got '{}'",
                target
            )));
        }

        let url = Url::parse(&format!("http://localhost{}", target)).map_err(|e| {
            ServerError::bad_request(format!("invalid request target '{}': {}", target, e))
        })?;

        Ok(Self {
            method: method.to_string(),
            path: url.path().to_string(),
            query: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        })
    }

    /// Returns the first non-blank value of a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .find(|v| !v.trim().is_empty())
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

/// Returns the length of the request head, including the blank line that
/// terminates it, once it is fully buffered.
pub fn head_len(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| i + 4)
        .or_else(|| buf.windows(2).position(|w| w == b"\n\n").map(|i| i + 2))
}

/// A response with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl HttpResponse {
    /// Creates a response from an already-encoded JSON body.
    pub fn json(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Creates an `{"error": message}` response.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": message.into() });
        Self::json(status, body.to_string())
    }

    /// Adds an extra header.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Encodes the status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            JSON_CONTENT_TYPE,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}
