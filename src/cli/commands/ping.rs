use anyhow::Context;
use serde_json::Value;
use std::time::Duration;

use crate::cli::{
    utils::{output_error, output_success},
    OutputFormat,
};

pub async fn handle(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let response = client
        .get(&endpoint)
        .send()
        .await
        .with_context(|| format!("could not reach {}", endpoint))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(&output_format, &format!("{} is healthy", url), Some(body))
    } else {
        output_error(&output_format, &format!("{} responded {}", url, status))?;
        anyhow::bail!("health check failed with status {}", status)
    }
}
