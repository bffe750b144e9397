use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::JwtKeys;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{DatabaseManager, Store};
use crate::entities::{Article, MenuItemReview, RecommendationRequest};
use crate::handlers::protected::{
    help_request, resource, ARTICLES_PATH, DINING_COMMONS_MENU_ITEMS_PATH, HELP_REQUESTS_PATH,
    MENU_ITEM_REVIEWS_PATH, RECOMMENDATION_REQUESTS_PATH,
};
use crate::handlers::public;

/// Everything the router needs; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub keys: Arc<JwtKeys>,
}

pub fn app(state: AppState) -> Router {
    let AppState { store, keys } = state;

    Router::new()
        // Public
        .merge(public_routes(store.clone()))
        // Role-gated resources
        .merge(resource::routes::<Article>(ARTICLES_PATH, store.articles.clone(), keys.clone()))
        .merge(resource::routes::<MenuItemReview>(
            MENU_ITEM_REVIEWS_PATH,
            store.menu_item_reviews.clone(),
            keys.clone(),
        ))
        .merge(resource::routes::<MenuItemReview>(
            DINING_COMMONS_MENU_ITEMS_PATH,
            store.dining_commons_menu_items.clone(),
            keys.clone(),
        ))
        .merge(resource::routes::<RecommendationRequest>(
            RECOMMENDATION_REQUESTS_PATH,
            store.recommendation_requests.clone(),
            keys.clone(),
        ))
        .merge(resource::routes(HELP_REQUESTS_PATH, store.help_requests.clone(), keys.clone()))
        .merge(help_request::routes(HELP_REQUESTS_PATH, store.help_request_queries.clone(), keys))
        .layer(TraceLayer::new_for_http())
}

fn public_routes(store: Store) -> Router {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .with_state(store)
}

fn with_cors(router: Router, security: &SecurityConfig) -> Router {
    router.layer(ServiceBuilder::new().layer(cors_layer(security)))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Choose the store, build the router and serve until Ctrl-C
pub async fn serve(config: &AppConfig, port_override: Option<u16>) -> anyhow::Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;

    let store = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Store::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
            Store::memory()
        }
    };

    let keys = Arc::new(JwtKeys::from_secret(&config.security.jwt_secret)?);

    let mut router = app(AppState {
        store: store.clone(),
        keys,
    });
    if config.security.enable_cors {
        router = with_cors(router, &config.security);
    }

    let port = port_override.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "UCSB API listening on http://{} ({:?}, {} store)",
        bind_addr,
        config.environment,
        store.backend()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
