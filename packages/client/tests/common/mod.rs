//! In-process stub backend for integration tests.

#![allow(dead_code)]

use axum::{Router, http::HeaderMap};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

/// Token the stub accepts
pub const VALID_TOKEN: &str = "t1";

/// Helper struct to manage the stub server lifecycle
pub struct StubServer {
    pub addr: std::net::SocketAddr,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Serve the router on an ephemeral port
    pub async fn start(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Failed to read local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        StubServer { addr, handle }
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bearer token sent with the request, if any
pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", name),
        "friends": []
    })
}

pub fn room_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "members": [
            {"user": {"_id": "u1", "name": "alice"}, "isAdmin": true, "hasLeft": false}
        ],
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:05:00Z"
    })
}
