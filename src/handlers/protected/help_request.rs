use axum::{
    extract::{rejection::QueryRejection, Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::resource::bad_query;
use crate::auth::{JwtKeys, Role};
use crate::database::HelpRequestRepository;
use crate::entities::HelpRequest;
use crate::error::ApiError;
use crate::middleware::{require_role, RoleGate};

type Queries = Arc<dyn HelpRequestRepository>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterQuery {
    pub requester_email: String,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// GET {base}/requester?requesterEmail=
pub async fn by_requester(
    State(repo): State<Queries>,
    query: Result<Query<RequesterQuery>, QueryRejection>,
) -> Result<Json<Vec<HelpRequest>>, ApiError> {
    let Query(RequesterQuery { requester_email }) = query.map_err(bad_query)?;
    Ok(Json(repo.find_all_by_requester(&requester_email).await?))
}

/// GET {base}/date?date=YYYY-MM-DD
pub async fn by_date(
    State(repo): State<Queries>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<Vec<HelpRequest>>, ApiError> {
    let Query(DateQuery { date }) = query.map_err(bad_query)?;
    Ok(Json(repo.find_all_by_date(date).await?))
}

pub fn routes(base: &str, repo: Queries, keys: Arc<JwtKeys>) -> Router {
    let user = middleware::from_fn_with_state(RoleGate::new(Role::User, keys), require_role);

    Router::new()
        .route(&format!("{}/requester", base), get(by_requester))
        .route(&format!("{}/date", base), get(by_date))
        .route_layer(user)
        .with_state(repo)
}
