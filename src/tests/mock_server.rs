// Local HTTP server for exercising the Sheets client and the webhook notifier

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Request body is not JSON")
    }
}

/// Canned response, optionally delayed
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

/// Serve `response` to every request on 127.0.0.1:0
pub async fn spawn_server(response: MockResponse) -> (SocketAddr, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let captured_clone = captured.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let io = TokioIo::new(stream);
            let captured = captured_clone.clone();
            let response = response.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let captured = captured.clone();
                    let response = response.clone();
                    async move {
                        let method = req.method().to_string();
                        let uri = req.uri().to_string();
                        let authorization = req
                            .headers()
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let body = req
                            .into_body()
                            .collect()
                            .await
                            .map(|collected| collected.to_bytes().to_vec())
                            .unwrap_or_default();

                        captured.lock().await.push(CapturedRequest {
                            method,
                            uri,
                            authorization,
                            body,
                        });

                        if !response.delay.is_zero() {
                            tokio::time::sleep(response.delay).await;
                        }

                        let mut reply = Response::new(Full::new(Bytes::from(response.body)));
                        *reply.status_mut() = StatusCode::from_u16(response.status)
                            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                        Ok::<_, Infallible>(reply)
                    }
                });

                let _ = http1::Builder::new().serve_connection(io, service).await;
            });
        }
    });

    (addr, captured)
}
