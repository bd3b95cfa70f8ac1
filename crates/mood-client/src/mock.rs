//! In-process stand-in for the analysis and task service.
//!
//! Routes are matched on method and path (query ignored). Each route serves
//! its queued responses in order and repeats the last one once the queue is
//! down to a single entry. Unmatched requests get a 404 with a `detail`.
//! Every request is recorded so tests can assert on what was sent.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Path prefix the mock serves under, mirroring the real deployment.
pub const API_PREFIX: &str = "/api/v1";

/// A canned reply.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: String,
    delay: Duration,
}

impl MockResponse {
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back for `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One request as the mock received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query string, including [`API_PREFIX`].
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    /// The raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

type Routes = HashMap<(String, String), VecDeque<MockResponse>>;

/// Builder for a [`MockServer`].
#[derive(Debug, Default)]
pub struct MockServerBuilder {
    routes: Routes,
}

impl MockServerBuilder {
    /// Queue `response` for `method` on `path` (relative to [`API_PREFIX`]).
    #[must_use]
    pub fn route(mut self, method: &str, path: &str, response: MockResponse) -> Self {
        self.routes
            .entry((method.to_ascii_uppercase(), format!("{API_PREFIX}{path}")))
            .or_default()
            .push_back(response);
        self
    }

    /// Bind to a random local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot bind.
    pub fn start(self) -> std::io::Result<MockServer> {
        let server = tiny_http::Server::http("127.0.0.1:0").map_err(std::io::Error::other)?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| std::io::Error::other("mock server has no IP address"))?;

        let server = Arc::new(server);
        let routes = Arc::new(Mutex::new(self.routes));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let server = Arc::clone(&server);
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            let shutdown = Arc::clone(&shutdown);
            std::thread::spawn(move || serve(&server, &routes, &requests, &shutdown))
        };

        Ok(MockServer {
            base_url: format!("http://{addr}{API_PREFIX}"),
            server,
            requests,
            shutdown,
            handle: Some(handle),
        })
    }
}

/// A running mock service. Stops when dropped.
pub struct MockServer {
    base_url: String,
    server: Arc<tiny_http::Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    #[must_use]
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::default()
    }

    /// Base URL to hand to the client, e.g. `http://127.0.0.1:PORT/api/v1`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received on `path` (relative to [`API_PREFIX`]).
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        let full = format!("{API_PREFIX}{path}");
        self.requests().iter().filter(|r| r.path() == full).count()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(
    server: &tiny_http::Server,
    routes: &Mutex<Routes>,
    requests: &Mutex<Vec<RecordedRequest>>,
    shutdown: &AtomicBool,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let mut request = match server.recv_timeout(Duration::from_millis(50)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(_) => break,
        };

        let mut body = Vec::new();
        let _ = request.as_reader().read_to_end(&mut body);
        let recorded = RecordedRequest {
            method: request.method().to_string().to_ascii_uppercase(),
            url: request.url().to_string(),
            content_type: request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string()),
            body,
        };

        let key = (recorded.method.clone(), recorded.path().to_string());
        let reply = {
            let mut routes = routes.lock().unwrap_or_else(PoisonError::into_inner);
            routes.get_mut(&key).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        }
        .unwrap_or_else(|| MockResponse::json(404, &serde_json::json!({ "detail": "Not Found" })));

        requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recorded);

        // Delayed replies go to their own thread so a slow route never
        // blocks the next request.
        std::thread::spawn(move || {
            if !reply.delay.is_zero() {
                std::thread::sleep(reply.delay);
            }
            let mut response =
                tiny_http::Response::from_string(reply.body).with_status_code(reply.status);
            if let Ok(header) =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            {
                response.add_header(header);
            }
            let _ = request.respond(response);
        });
    }
}
