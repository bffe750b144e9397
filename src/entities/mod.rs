pub mod article;
pub mod format;
pub mod help_request;
pub mod menu_item_review;
pub mod recommendation_request;

pub use article::{Article, NewArticle};
pub use help_request::{HelpRequest, NewHelpRequest};
pub use menu_item_review::{MenuItemReview, NewMenuItemReview};
pub use recommendation_request::{NewRecommendationRequest, RecommendationRequest};

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};
use std::fmt::Debug;

use crate::database::PgQueryAs;

/// A persisted record type served by the generic CRUD handlers.
///
/// Identity is an `i64` assigned by the store. A record whose id is `0` has
/// never been saved; repositories insert it and hand back the stored copy.
pub trait Resource:
    Clone + Debug + Serialize + DeserializeOwned + for<'r> FromRow<'r, PgRow> + Unpin + Send + Sync + 'static
{
    /// Name reported in not-found and delete messages.
    const NAME: &'static str;

    /// Persisted columns other than `id`, in the order `bind_columns` binds them.
    const COLUMNS: &'static [&'static str];

    /// Query parameters accepted by the create endpoint.
    type Create: DeserializeOwned + Send + 'static;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn from_create(params: Self::Create) -> Self;

    /// Replace every mutable field with the incoming values. Identity is kept.
    fn apply_update(&mut self, incoming: Self);

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}
