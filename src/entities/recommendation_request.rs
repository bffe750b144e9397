use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Resource;
use crate::database::PgQueryAs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default, deserialize_with = "super::format::nullable_id")]
    pub id: i64,
    pub requester_email: String,
    pub professor_email: String,
    pub explanation: String,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_requested: NaiveDateTime,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_needed: NaiveDateTime,
    pub done: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendationRequest {
    // Older frontends send the misspelled key.
    #[serde(alias = "requestorEmail")]
    pub requester_email: String,
    pub professor_email: String,
    pub explanation: String,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_requested: NaiveDateTime,
    #[serde(deserialize_with = "super::format::local_date_time")]
    pub date_needed: NaiveDateTime,
    pub done: bool,
}

impl Resource for RecommendationRequest {
    const NAME: &'static str = "RecommendationRequest";
    const COLUMNS: &'static [&'static str] = &[
        "requester_email",
        "professor_email",
        "explanation",
        "date_requested",
        "date_needed",
        "done",
    ];

    type Create = NewRecommendationRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn from_create(params: NewRecommendationRequest) -> Self {
        Self {
            id: 0,
            requester_email: params.requester_email,
            professor_email: params.professor_email,
            explanation: params.explanation,
            date_requested: params.date_requested,
            date_needed: params.date_needed,
            done: params.done,
        }
    }

    fn apply_update(&mut self, incoming: Self) {
        self.requester_email = incoming.requester_email;
        self.professor_email = incoming.professor_email;
        self.explanation = incoming.explanation;
        self.date_requested = incoming.date_requested;
        self.date_needed = incoming.date_needed;
        self.done = incoming.done;
    }

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&self.requester_email)
            .bind(&self.professor_email)
            .bind(&self.explanation)
            .bind(self.date_requested)
            .bind(self.date_needed)
            .bind(self.done)
    }
}
