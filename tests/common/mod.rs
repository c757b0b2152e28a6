//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use anon_gate::config::GateConfig;
use anon_gate::http::HttpServer;
use anon_gate::lifecycle::Shutdown;

/// Start a mock upstream that answers 200 with the request line as body,
/// e.g. `GET /index.php?module=Login HTTP/1.1`.
pub async fn start_mock_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        let (read, mut write) = socket.into_split();
                        let mut reader = BufReader::new(read);
                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers.
                        let mut line = String::new();
                        while reader.read_line(&mut line).await.map(|n| n > 2).unwrap_or(false) {
                            line.clear();
                        }

                        let body = request_line.trim_end();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = write.write_all(response.as_bytes()).await;
                        let _ = write.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A running gate and the handles needed to drive it.
#[allow(dead_code)]
pub struct TestGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<GateConfig>,
}

impl TestGate {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

/// Start the gate in front of `upstream` with the given configuration.
pub async fn start_gate(mut config: GateConfig, upstream: SocketAddr) -> TestGate {
    config.upstream.address = upstream.to_string();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestGate {
        addr,
        shutdown,
        config_tx,
    }
}

/// HTTP client that does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
