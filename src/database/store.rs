use sqlx::PgPool;
use std::sync::Arc;

use crate::database::help_request::HelpRequestRepository;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::memory::MemoryRepository;
use crate::database::repository::{PgRepository, Repository};
use crate::entities::{Article, HelpRequest, MenuItemReview, RecommendationRequest};

pub const ARTICLES_TABLE: &str = "articles";
pub const MENU_ITEM_REVIEWS_TABLE: &str = "menuitemreview";
pub const DINING_COMMONS_MENU_ITEMS_TABLE: &str = "ucsbdiningcommonsmenuitem";
pub const RECOMMENDATION_REQUESTS_TABLE: &str = "recommendationrequest";
pub const HELP_REQUESTS_TABLE: &str = "helprequest";

/// One repository per resource, all backed by the same store
#[derive(Clone)]
pub struct Store {
    pool: Option<PgPool>,
    pub articles: Arc<dyn Repository<Article>>,
    pub menu_item_reviews: Arc<dyn Repository<MenuItemReview>>,
    pub dining_commons_menu_items: Arc<dyn Repository<MenuItemReview>>,
    pub recommendation_requests: Arc<dyn Repository<RecommendationRequest>>,
    pub help_requests: Arc<dyn Repository<HelpRequest>>,
    pub help_request_queries: Arc<dyn HelpRequestRepository>,
}

impl Store {
    pub fn postgres(pool: PgPool) -> Self {
        let help_requests = Arc::new(PgRepository::<HelpRequest>::new(HELP_REQUESTS_TABLE, pool.clone()));
        Self {
            articles: Arc::new(PgRepository::<Article>::new(ARTICLES_TABLE, pool.clone())),
            menu_item_reviews: Arc::new(PgRepository::<MenuItemReview>::new(MENU_ITEM_REVIEWS_TABLE, pool.clone())),
            dining_commons_menu_items: Arc::new(PgRepository::<MenuItemReview>::new(
                DINING_COMMONS_MENU_ITEMS_TABLE,
                pool.clone(),
            )),
            recommendation_requests: Arc::new(PgRepository::<RecommendationRequest>::new(
                RECOMMENDATION_REQUESTS_TABLE,
                pool.clone(),
            )),
            help_requests: help_requests.clone(),
            help_request_queries: help_requests,
            pool: Some(pool),
        }
    }

    pub fn memory() -> Self {
        let help_requests = Arc::new(MemoryRepository::<HelpRequest>::new());
        Self {
            pool: None,
            articles: Arc::new(MemoryRepository::<Article>::new()),
            menu_item_reviews: Arc::new(MemoryRepository::<MenuItemReview>::new()),
            dining_commons_menu_items: Arc::new(MemoryRepository::<MenuItemReview>::new()),
            recommendation_requests: Arc::new(MemoryRepository::<RecommendationRequest>::new()),
            help_requests: help_requests.clone(),
            help_request_queries: help_requests,
        }
    }

    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await,
            None => Ok(()),
        }
    }

    /// Close the underlying pool, if any
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
