#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use ucsb_api_rust::app::{app, AppState};
use ucsb_api_rust::auth::{Claims, JwtKeys, Role};
use ucsb_api_rust::database::Store;

pub const TEST_SECRET: &str = "integration-secret";

/// A server bound to an ephemeral port on the current test's runtime
pub struct TestServer {
    pub base_url: String,
    pub store: Store,
    pub client: reqwest::Client,
    keys: Arc<JwtKeys>,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        let store = Store::memory();
        let keys = Arc::new(JwtKeys::from_secret(TEST_SECRET)?);
        let router = app(AppState {
            store: store.clone(),
            keys: keys.clone(),
        });

        // Port 0 lets the OS choose, so tests can run in parallel
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url,
            store,
            client: reqwest::Client::new(),
            keys,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_for(&self, email: &str, roles: &[Role]) -> String {
        let claims = Claims::new(email, roles.to_vec(), 1).expect("token claims");
        self.keys.generate(&claims).expect("token generation")
    }

    pub fn user_token(&self) -> String {
        self.token_for("cgaucho@ucsb.edu", &[Role::User])
    }

    pub fn admin_token(&self) -> String {
        self.token_for("admin@ucsb.edu", &[Role::Admin, Role::User])
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Status plus JSON body (or `Null` when the body is empty or not JSON)
pub async fn read(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let text = res.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);
    Ok((status, body))
}
