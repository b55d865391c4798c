//! Mock YouTube Data API server for testing.
//!
//! The server listens on a random localhost port, records every request it receives, and answers
//! each `(method, path)` route from a queue of scripted responses. The last queued response of a
//! route is repeated once the queue is down to one entry, so polling loops can keep hitting it.
//! Requests to a route with nothing scripted get a 404.

use crate::config::ClientConfig;
use crate::youtube_api::YouTubeClient;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const PATH_PREFIX: &str = "/youtube/v3/";

/// A scripted reply.
#[derive(Debug, Clone)]
pub(crate) struct MockResponse {
    status: StatusCode,
    body: String,
}

impl MockResponse {
    pub(crate) fn json(body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    pub(crate) fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    /// Path relative to the API root, e.g. `liveBroadcasts/bind`.
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) authorization: Option<String>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) received_at: Instant,
}

impl RecordedRequest {
    pub(crate) fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<MockResponse>>,
    requests: Vec<RecordedRequest>,
}

#[derive(Debug)]
pub(crate) struct MockYouTubeServer {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
    accept_loop: JoinHandle<()>,
}

impl MockYouTubeServer {
    pub(crate) async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock YouTube server");
        let addr = listener.local_addr().expect("get local address");
        let state = Arc::new(Mutex::new(MockState::default()));

        let accept_state = Arc::clone(&state);
        let accept_loop = tokio::spawn(async move {
            loop {
                let Ok((conn, _)) = listener.accept().await else {
                    break;
                };
                let conn = hyper_util::rt::TokioIo::new(conn);
                let state = Arc::clone(&accept_state);
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(handle(state, req).await) }
                    });
                    if let Err(e) = hyper::server::conn::http1::Builder::new()
                        .serve_connection(conn, service)
                        .await
                    {
                        tracing::debug!(error = %e, "mock YouTube connection ended with error");
                    }
                });
            }
        });

        Self {
            addr,
            state,
            accept_loop,
        }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, PATH_PREFIX.trim_end_matches('/'))
    }

    pub(crate) fn client(&self) -> YouTubeClient {
        YouTubeClient::new(
            &ClientConfig::default()
                .with_base_url(self.base_url())
                .with_request_timeout(Duration::from_secs(10)),
        )
    }

    /// Queues a response for `method` requests to `path` (relative to the API root).
    pub(crate) async fn respond(&self, method: Method, path: &str, response: MockResponse) {
        self.state
            .lock()
            .await
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// All requests received so far, in arrival order.
    pub(crate) async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Requests received so far for one route.
    pub(crate) async fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Waits until at least `count` requests have hit `path`.
    pub(crate) async fn wait_for_requests(&self, method: Method, path: &str, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while self.requests_to(method.clone(), path).await.len() < count {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {count} {method} requests to {path}"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl Drop for MockYouTubeServer {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}

async fn handle(state: Arc<Mutex<MockState>>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let received_at = Instant::now();
    let method = req.method().clone();
    let path = req
        .uri()
        .path()
        .strip_prefix(PATH_PREFIX)
        .unwrap_or(req.uri().path())
        .to_string();
    let query = form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let authorization = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body(Full::from(format!("unreadable body: {e}")))
                .expect("static response is valid");
        }
    };
    let body = (!body.is_empty())
        .then(|| serde_json::from_slice(&body).expect("mock server only accepts JSON bodies"));

    let mut state = state.lock().await;
    state.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization,
        body,
        received_at,
    });

    let response = match state.routes.get_mut(&(method.clone(), path.clone())) {
        Some(queue) if queue.len() > 1 => queue.pop_front(),
        Some(queue) => queue.front().cloned(),
        None => None,
    };
    let response = response.unwrap_or_else(|| {
        MockResponse::text(
            StatusCode::NOT_FOUND,
            format!("no mock response for {method} {path}"),
        )
    });

    Response::builder()
        .status(response.status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::from(response.body))
        .expect("scripted response is valid")
}
