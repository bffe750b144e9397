use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config();

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    let target = match config.database.url.as_deref() {
        Some(url) => DatabaseManager::redact_url(url)?,
        None => String::new(),
    };

    output_success(
        &output_format,
        "Migrations applied",
        Some(json!({ "database": target })),
    )
}
