//! # Common Test Utilities
//!
//! `TestApp` spawns the real server on a random port. The database points at a
//! closed port so every query falls back to mock rows, no Google Maps key is set,
//! and an `httpmock::MockServer` can stand in for a local AI backend.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use geomind_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use httpmock::MockServer;
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr, sync::Once};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

static TRACING: Once = Once::new();

fn setup_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .with_test_writer()
            .try_init();
    });
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns a server with no AI or maps credentials.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(false).await
    }

    /// Spawns a server whose text tasks use a local model served by `mock_server`.
    pub async fn spawn_with_local_model() -> Result<Self> {
        Self::spawn_with(true).await
    }

    async fn spawn_with(local_model: bool) -> Result<Self> {
        setup_tracing();
        let mock_server = MockServer::start_async().await;

        let mut config_content = String::from(
            r#"
port: 0
db:
  host: "127.0.0.1"
  port: 1
  acquire_timeout_secs: 1
max_upload_bytes: 65536
"#,
        );
        if local_model {
            config_content.push_str(&format!(
                r#"
providers:
  gemini_text:
    provider: "local"
    api_url: "{}"
    model_name: "mock-chat-model"
"#,
                mock_server.url("/v1/chat/completions")
            ));
        }

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let mut config = config::get_config(config_path.to_str())?;
        strip_credentials(&mut config);
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router_state = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(router_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Removes any Gemini or Maps keys picked up from the developer's environment.
fn strip_credentials(config: &mut AppConfig) {
    config.gemini_api_key = None;
    config.maps.api_key = None;
    for provider in config.providers.values_mut() {
        if provider.provider == "gemini" {
            provider.api_key = None;
        }
    }
}
