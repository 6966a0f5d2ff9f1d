//! HTTP front end
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | plain-text banner |
//! | `GET /faces/{name}?width=N` | face PNG, `X-Actual-Width` when snapped |
//! | `GET /ping` | `{"ping": "<n>ms"}` |
//! | `GET /version` | `{"version": "<crate version>"}` |
//!
//! Requests are accepted on a blocking `tiny_http` loop and each one is
//! handled as its own task on the tokio runtime.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::fetch::TextureSource;
use crate::service::{FaceError, FaceService};

pub const ACTUAL_WIDTH_HEADER: &str = "X-Actual-Width";

const BANNER: &str = "PixelFace API is online.";
const NOT_FOUND_BODY: &str = "Texture not found for that mob.";
const FETCH_FAILED_BODY: &str = "Failed fetching image.";
const PROCESS_FAILED_BODY: &str = "Failed to process image.";

/// Server startup error
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("accept loop stopped: {0}")]
    AcceptLoop(String),
}

/// A response ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn json(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            headers: Vec::new(),
            body: value.to_string().into_bytes(),
        }
    }

    fn png(body: Vec<u8>) -> Self {
        Self { status: 200, content_type: "image/png", headers: Vec::new(), body }
    }

    /// Look up an extra header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    fn into_response(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let mut response = tiny_http::Response::from_data(self.body).with_status_code(self.status);
        let headers = std::iter::once(("Content-Type", self.content_type.to_string())).chain(self.headers);
        for (name, value) in headers {
            match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => warn!(name, value = %value, "dropping invalid response header"),
            }
        }
        response
    }
}

/// Request handling state shared by all connections.
pub struct App<S> {
    service: FaceService<S>,
    max_width: u32,
}

impl<S: TextureSource + 'static> App<S> {
    pub fn new(service: FaceService<S>, max_width: u32) -> Self {
        Self { service, max_width }
    }

    /// Route one request.
    pub async fn handle(&self, method: &str, url: &str) -> Reply {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));

        if method != "GET" {
            return Reply::text(405, "Method not allowed.");
        }

        match path.trim_end_matches('/') {
            "" => Reply::text(200, BANNER),
            "/ping" => ping().await,
            "/version" => Reply::json(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
            other => match other.strip_prefix("/faces/") {
                Some(name) => self.face(name, query).await,
                None => Reply::text(404, "Not found."),
            },
        }
    }

    async fn face(&self, raw_name: &str, query: &str) -> Reply {
        let name = raw_name.to_lowercase();
        if !is_valid_name(&name) {
            return Reply::text(400, "Invalid mob name.");
        }
        let width = match parse_width(query, self.max_width) {
            Ok(width) => width,
            Err(message) => return Reply::text(400, &message),
        };

        match self.service.render(&name, width).await {
            Ok(face) => {
                let actual = face.actual_width();
                let mut reply = Reply::png(face.png);
                if let Some(actual) = actual {
                    reply.headers.push((ACTUAL_WIDTH_HEADER, actual.to_string()));
                }
                reply
            }
            Err(e) => error_reply(&name, e),
        }
    }

    async fn respond(&self, request: tiny_http::Request) {
        let method = request.method().to_string();
        let url = request.url().to_string();
        let reply = self.handle(&method, &url).await;
        debug!(method = %method, url = %url, status = reply.status, "request handled");

        let response = reply.into_response();
        let written = tokio::task::spawn_blocking(move || request.respond(response)).await;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("failed to write response: {}", e),
            Err(e) => warn!("response task failed: {}", e),
        }
    }
}

/// Bind `addr` and serve until the listener fails.
pub async fn run<S: TextureSource + 'static>(app: Arc<App<S>>, addr: &str) -> Result<(), ServerError> {
    let server = tiny_http::Server::http(addr)
        .map_err(|e| ServerError::Bind { addr: addr.to_string(), message: e.to_string() })?;
    info!("server running at http://{}", addr);

    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        for request in server.incoming_requests() {
            let app = Arc::clone(&app);
            handle.spawn(async move { app.respond(request).await });
        }
    })
    .await
    .map_err(|e| ServerError::AcceptLoop(e.to_string()))
}

async fn ping() -> Reply {
    let start = Instant::now();
    tokio::task::yield_now().await;
    let latency = start.elapsed().as_millis();
    Reply::json(serde_json::json!({ "ping": format!("{}ms", latency) }))
}

fn error_reply(name: &str, err: FaceError) -> Reply {
    match err {
        FaceError::NotFound { .. } => {
            info!(name, "no texture");
            Reply::text(404, NOT_FOUND_BODY)
        }
        FaceError::Upstream(e) => {
            error!(name, "error fetching texture: {}", e);
            Reply::text(500, FETCH_FAILED_BODY)
        }
        other => {
            error!(name, "image processing error: {}", other);
            Reply::text(500, PROCESS_FAILED_BODY)
        }
    }
}

/// Mob names are lowercase ASCII letters, digits, `_` and `-`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// Read `width` from a query string.
///
/// Absent means "use the default" (`Ok(None)`). Present values must be
/// integers in `1..=max_width`.
pub fn parse_width(query: &str, max_width: u32) -> Result<Option<u32>, String> {
    let raw = query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == "width")
        .map(|(_, value)| value);

    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(width) if width >= 1 && width <= max_width => Ok(Some(width)),
        Ok(_) => Err(format!("width must be between 1 and {}.", max_width)),
        Err(_) => Err("width must be an integer.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("baby_zombie"));
        assert!(is_valid_name("snow-golem2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("../secrets"));
        assert!(!is_valid_name("cat/black"));
        assert!(!is_valid_name("Cat"));
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("", 1024), Ok(None));
        assert_eq!(parse_width("scale=8", 1024), Ok(None));
        assert_eq!(parse_width("width=100", 1024), Ok(Some(100)));
        assert_eq!(parse_width("x=1&width=32", 1024), Ok(Some(32)));
        assert!(parse_width("width=0", 1024).is_err());
        assert!(parse_width("width=2048", 1024).is_err());
        assert!(parse_width("width=big", 1024).is_err());
        assert!(parse_width("width", 1024).is_err());
    }

    #[test]
    fn test_reply_header_lookup() {
        let mut reply = Reply::png(Vec::new());
        reply.headers.push((ACTUAL_WIDTH_HEADER, "72".to_string()));
        assert_eq!(reply.header("x-actual-width"), Some("72"));
        assert_eq!(reply.header("etag"), None);
    }
}
