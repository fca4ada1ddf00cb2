//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use model_viewer::config::ViewerConfig;
use model_viewer::lifecycle::Shutdown;
use model_viewer::proxy::ConcurrencyGate;
use model_viewer::HttpServer;
use tokio::net::TcpListener;

/// Serve `router` as an upstream stub on an ephemeral port.
pub async fn start_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Defaults, with the proxy origin and item endpoint pointed at `upstream`.
pub fn config_for(upstream: SocketAddr) -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.proxy.origin = format!("http://{}/live/", upstream);
    config.items.lookup_url = format!("http://{}/", upstream);
    config
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub gate: Arc<ConcurrencyGate>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait until every admission token is back, or fail after one second.
    pub async fn assert_gate_idle(&self) {
        for _ in 0..100 {
            if self.gate.available() == self.gate.capacity() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "gate still has {} of {} tokens outstanding",
            self.gate.in_flight(),
            self.gate.capacity()
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the viewer on an ephemeral port.
pub async fn start_server(config: ViewerConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let gate = server.gate();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        gate,
        shutdown,
    }
}

/// Client that neither uses a system proxy nor decompresses on its own.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A few hundred KiB of loosely repetitive JSON-ish text.
pub fn model_payload() -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..20_000u64 {
        writeln!(out, "{{\"bone\":{},\"weight\":{}}}", i, (i * i * 31) % 9973).unwrap();
    }
    out
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}
