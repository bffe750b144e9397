// handlers/public/mod.rs - Unauthenticated service endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::protected::{
    ARTICLES_PATH, DINING_COMMONS_MENU_ITEMS_PATH, HELP_REQUESTS_PATH, MENU_ITEM_REVIEWS_PATH,
    RECOMMENDATION_REQUESTS_PATH,
};
use crate::database::Store;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "UCSB API (Rust)",
        "version": version,
        "resources": [
            ARTICLES_PATH,
            MENU_ITEM_REVIEWS_PATH,
            DINING_COMMONS_MENU_ITEMS_PATH,
            RECOMMENDATION_REQUESTS_PATH,
            HELP_REQUESTS_PATH,
        ],
        "roles": {
            "read": "ROLE_USER",
            "write": "ROLE_ADMIN",
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(store): State<Store>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": store.backend(),
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": store.backend(),
                })),
            )
        }
    }
}
