use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Resource;
use crate::database::PgQueryAs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "super::format::nullable_id")]
    pub id: i64,
    pub title: String,
    pub url: String,
    pub explanation: String,
    pub email: String,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_added: NaiveDateTime,
}

/// `POST /api/articles/post` query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub explanation: String,
    pub email: String,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_added: NaiveDateTime,
}

impl Resource for Article {
    const NAME: &'static str = "Articles";
    const COLUMNS: &'static [&'static str] = &["title", "url", "explanation", "email", "date_added"];

    type Create = NewArticle;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn from_create(params: NewArticle) -> Self {
        tracing::info!("dateAdded={}", params.date_added);
        Self {
            id: 0,
            title: params.title,
            url: params.url,
            explanation: params.explanation,
            email: params.email,
            date_added: params.date_added,
        }
    }

    fn apply_update(&mut self, incoming: Self) {
        self.title = incoming.title;
        self.url = incoming.url;
        self.explanation = incoming.explanation;
        self.email = incoming.email;
        self.date_added = incoming.date_added;
    }

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&self.title)
            .bind(&self.url)
            .bind(&self.explanation)
            .bind(&self.email)
            .bind(self.date_added)
    }
}
