use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Resource;
use crate::database::PgQueryAs;

/// A review of a dining commons menu item. `item_id` is a plain number, not
/// a reference the store enforces.
///
/// The `/api/UCSBDiningCommonsMenuItem` endpoints serve records of this same
/// shape from their own table, and report them as `MenuItemReview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemReview {
    #[serde(default, deserialize_with = "super::format::nullable_id")]
    pub id: i64,
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_reviewed: NaiveDateTime,
    pub comments: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItemReview {
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_reviewed: NaiveDateTime,
    pub comments: String,
}

impl Resource for MenuItemReview {
    const NAME: &'static str = "MenuItemReview";
    const COLUMNS: &'static [&'static str] =
        &["item_id", "reviewer_email", "stars", "date_reviewed", "comments"];

    type Create = NewMenuItemReview;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn from_create(params: NewMenuItemReview) -> Self {
        tracing::info!(
            "postItemReview: itemId={}, reviewerEmail={}, stars={}, dateReviewed={}",
            params.item_id,
            params.reviewer_email,
            params.stars,
            params.date_reviewed
        );
        Self {
            id: 0,
            item_id: params.item_id,
            reviewer_email: params.reviewer_email,
            stars: params.stars,
            date_reviewed: params.date_reviewed,
            comments: params.comments,
        }
    }

    fn apply_update(&mut self, incoming: Self) {
        self.item_id = incoming.item_id;
        self.reviewer_email = incoming.reviewer_email;
        self.stars = incoming.stars;
        self.date_reviewed = incoming.date_reviewed;
        self.comments = incoming.comments;
    }

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.item_id)
            .bind(&self.reviewer_email)
            .bind(self.stars)
            .bind(self.date_reviewed)
            .bind(&self.comments)
    }
}
