//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use spend_tracker::config::AppConfig;
use spend_tracker::lifecycle::startup;
use spend_tracker::Shutdown;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the shell with default config, bound to 127.0.0.1:0.
pub async fn start_server() -> TestServer {
    start_server_with(AppConfig::default()).await
}

/// Start the shell with `config`, overriding the bind address.
pub async fn start_server_with(mut config: AppConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;

    let (server, listener) = startup::prepare(config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
