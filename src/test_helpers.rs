//! In-process API server for tests.

use std::time::Duration;

use axum::Router;

use crate::config::ClientConfig;
use crate::net::http::ApiClient;
use crate::store::session::Session;

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

/// Client against `base_url` with a short timeout and an in-memory session.
pub fn client(base_url: &str) -> ApiClient {
    let mut config = ClientConfig::new(base_url);
    config.request_timeout = Duration::from_secs(5);
    ApiClient::new(config, Session::ephemeral()).unwrap()
}

/// Base URL of a port that refuses connections.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}
