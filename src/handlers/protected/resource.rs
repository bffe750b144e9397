// Generic CRUD handlers shared by every resource.
//
// Each resource router is stateful over its own repository. Role gates are
// route layers, so they run before query/body extraction and a rejected
// caller never reaches the repository.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{JwtKeys, Role};
use crate::database::Repository;
use crate::entities::Resource;
use crate::error::ApiError;
use crate::middleware::{require_role, AuthUser, RoleGate};

type Repo<R> = Arc<dyn Repository<R>>;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// Confirmation body for deletes
#[derive(Debug, Serialize)]
pub struct GenericMessage {
    pub message: String,
}

pub(crate) fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

/// GET {base}/all
pub async fn list<R: Resource>(State(repo): State<Repo<R>>) -> Result<Json<Vec<R>>, ApiError> {
    let all = repo.find_all().await?;
    tracing::debug!("Listed {} {} records", all.len(), R::NAME);
    Ok(Json(all))
}

/// GET {base}?id=
pub async fn get_by_id<R: Resource>(
    State(repo): State<Repo<R>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<R>, ApiError> {
    let Query(IdQuery { id }) = query.map_err(bad_query)?;

    let found = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(R::NAME, id))?;

    Ok(Json(found))
}

/// POST {base}/post?<fields>
pub async fn create<R: Resource>(
    State(repo): State<Repo<R>>,
    Extension(user): Extension<AuthUser>,
    params: Result<Query<R::Create>, QueryRejection>,
) -> Result<Json<R>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;

    let saved = repo.save(R::from_create(params)).await?;
    tracing::info!("Created {} with id {} by {}", R::NAME, saved.id(), user.email);

    Ok(Json(saved))
}

/// PUT {base}?id= with the full record as the body
pub async fn update<R: Resource>(
    State(repo): State<Repo<R>>,
    query: Result<Query<IdQuery>, QueryRejection>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Query(IdQuery { id }) = query.map_err(bad_query)?;
    let Json(incoming) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    tracing::info!("id={} incoming={:?}", id, incoming);

    let mut existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(R::NAME, id))?;

    existing.apply_update(incoming);
    let saved = repo.save(existing).await?;

    Ok(Json(saved))
}

/// DELETE {base}?id=
pub async fn delete<R: Resource>(
    State(repo): State<Repo<R>>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<GenericMessage>, ApiError> {
    let Query(IdQuery { id }) = query.map_err(bad_query)?;

    if repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(R::NAME, id));
    }

    repo.delete(id).await?;
    tracing::info!("Deleted {} with id {} by {}", R::NAME, id, user.email);

    Ok(Json(GenericMessage {
        message: format!("{} with id {} deleted", R::NAME, id),
    }))
}

/// Register list/get/create/update/delete for one resource under `base`
pub fn routes<R: Resource>(base: &str, repo: Repo<R>, keys: Arc<JwtKeys>) -> Router {
    let user = middleware::from_fn_with_state(RoleGate::new(Role::User, keys.clone()), require_role);
    let admin = middleware::from_fn_with_state(RoleGate::new(Role::Admin, keys), require_role);

    Router::new()
        .route(&format!("{}/all", base), get(list::<R>).route_layer(user.clone()))
        .route(&format!("{}/post", base), post(create::<R>).route_layer(admin.clone()))
        .route(
            base,
            get(get_by_id::<R>)
                .route_layer(user)
                .merge(put(update::<R>).delete(delete::<R>).route_layer(admin)),
        )
        .with_state(repo)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::auth::Role;
    use crate::entities::{Article, MenuItemReview};
    use crate::testing::TestContext;

    fn article(n: i64) -> Article {
        Article {
            id: 0,
            title: format!("test article {}", n),
            url: format!("url{}.test", n),
            explanation: format!("test explanation {}", n),
            email: format!("tesmail{}@ucsb.edu", n),
            date_added: format!("2022-01-0{}T00:00:00", n + 2).parse().unwrap(),
        }
    }

    fn review() -> MenuItemReview {
        MenuItemReview {
            id: 0,
            item_id: 1,
            reviewer_email: "test1@ucsb.edu".to_string(),
            stars: 5,
            date_reviewed: "2022-01-03T00:00:00".parse().unwrap(),
            comments: "Thisisatestcomment1".to_string(),
        }
    }

    #[tokio::test]
    async fn logged_out_users_are_forbidden_everywhere() {
        let ctx = TestContext::new();
        let requests = [
            (Method::GET, "/api/articles/all"),
            (Method::GET, "/api/articles?id=1"),
            (Method::POST, "/api/articles/post"),
            (Method::PUT, "/api/articles?id=1"),
            (Method::DELETE, "/api/articles?id=1"),
        ];

        for (method, uri) in requests {
            let (status, body) = ctx.send(method.clone(), uri, None, None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
            assert_eq!(body["type"], "AccessDeniedException");
        }
    }

    #[tokio::test]
    async fn regular_users_cannot_write() {
        let ctx = TestContext::new();
        let stored = ctx.store.articles.save(article(1)).await.unwrap();
        let token = ctx.token(&[Role::User]);

        let (status, _) = ctx
            .send(Method::POST, "/api/articles/post", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = ctx
            .send(Method::PUT, "/api/articles?id=1", Some(&token), Some(json!({"title": "x"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = ctx.send(Method::DELETE, "/api/articles?id=1", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        assert_eq!(ctx.store.articles.find_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn admin_only_tokens_cannot_read() {
        let ctx = TestContext::new();
        let token = ctx.token(&[Role::Admin]);

        let (status, _) = ctx.send(Method::GET, "/api/articles/all", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn garbage_tokens_are_forbidden() {
        let ctx = TestContext::new();
        let (status, _) = ctx
            .send(Method::GET, "/api/articles/all", Some("not.a.jwt"), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn logged_in_user_can_get_all_articles() {
        let ctx = TestContext::new();
        let first = ctx.store.articles.save(article(1)).await.unwrap();
        let second = ctx.store.articles.save(article(2)).await.unwrap();

        let (status, body) = ctx
            .send(Method::GET, "/api/articles/all", Some(&ctx.token(&[Role::User])), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(vec![first, second]).unwrap());
    }

    #[tokio::test]
    async fn logged_in_user_can_get_by_id_when_the_id_exists() {
        let ctx = TestContext::new();
        let stored = ctx.store.articles.save(article(1)).await.unwrap();

        let (status, body) = ctx
            .send(Method::GET, "/api/articles?id=1", Some(&ctx.token(&[Role::User])), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::to_value(stored).unwrap());
    }

    #[tokio::test]
    async fn logged_in_user_gets_not_found_for_missing_id() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .send(Method::GET, "/api/articles?id=7", Some(&ctx.token(&[Role::User])), None)
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["type"], "EntityNotFoundException");
        assert_eq!(body["message"], "Articles with id 7 not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_bad_request() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .send(Method::GET, "/api/articles?id=abc", Some(&ctx.token(&[Role::User])), None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "BadRequestException");
    }

    #[tokio::test]
    async fn an_admin_user_can_post_a_new_menu_item_review() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/menuitemreview/post?itemId=1&reviewerEmail=test@ucsb.edu&stars=5&dateReviewed=2021-05-01T12:00:00&comments=This%20is%20a%20test",
                Some(&ctx.admin_token()),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": 1,
                "itemId": 1,
                "reviewerEmail": "test@ucsb.edu",
                "stars": 5,
                "dateReviewed": "2021-05-01T12:00:00",
                "comments": "This is a test"
            })
        );

        let stored = ctx.store.menu_item_reviews.find_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(serde_json::to_value(&stored[0]).unwrap(), body);
    }

    #[tokio::test]
    async fn create_with_missing_fields_is_a_bad_request_and_saves_nothing() {
        let ctx = TestContext::new();

        let (status, _) = ctx
            .send(Method::POST, "/api/articles/post?title=only", Some(&ctx.admin_token()), None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(ctx.store.articles.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_can_edit_an_existing_review() {
        let ctx = TestContext::new();
        ctx.store.dining_commons_menu_items.save(review()).await.unwrap();

        let edited = json!({
            "itemId": 2,
            "reviewerEmail": "test2@ucsb.edu",
            "stars": 3,
            "dateReviewed": "2022-01-04T00:00:00",
            "comments": "This is a test comment 2"
        });
        let (status, body) = ctx
            .send(
                Method::PUT,
                "/api/UCSBDiningCommonsMenuItem?id=1",
                Some(&ctx.admin_token()),
                Some(edited),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["itemId"], 2);
        assert_eq!(body["stars"], 3);
        assert_eq!(body["comments"], "This is a test comment 2");

        let stored = ctx.store.dining_commons_menu_items.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(serde_json::to_value(stored).unwrap(), body);
    }

    #[tokio::test]
    async fn admin_cannot_edit_a_review_that_does_not_exist() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .send(
                Method::PUT,
                "/api/UCSBDiningCommonsMenuItem?id=1",
                Some(&ctx.admin_token()),
                Some(serde_json::to_value(review()).unwrap()),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "MenuItemReview with id 1 not found");
        assert!(ctx.store.dining_commons_menu_items.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_rejected() {
        let ctx = TestContext::new();
        let stored = ctx.store.articles.save(article(1)).await.unwrap();

        let (status, body) = ctx
            .send(
                Method::PUT,
                "/api/articles?id=1",
                Some(&ctx.admin_token()),
                Some(json!({"title": "missing everything else"})),
            )
            .await;

        assert!(status.is_client_error());
        assert_eq!(body["type"], "InvalidJsonException");
        assert_eq!(ctx.store.articles.find_by_id(1).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn admin_can_delete_a_review() {
        let ctx = TestContext::new();
        ctx.store.dining_commons_menu_items.save(review()).await.unwrap();

        let (status, body) = ctx
            .send(Method::DELETE, "/api/UCSBDiningCommonsMenuItem?id=1", Some(&ctx.admin_token()), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "MenuItemReview with id 1 deleted"}));
        assert!(ctx.store.dining_commons_menu_items.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_tries_to_delete_non_existent_review_and_gets_right_error_message() {
        let ctx = TestContext::new();
        let kept = ctx.store.menu_item_reviews.save(review()).await.unwrap();

        let (status, body) = ctx
            .send(Method::DELETE, "/api/menuitemreview?id=15", Some(&ctx.admin_token()), None)
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "MenuItemReview with id 15 not found");
        assert_eq!(ctx.store.menu_item_reviews.find_all().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn resources_do_not_share_tables() {
        let ctx = TestContext::new();
        ctx.store.menu_item_reviews.save(review()).await.unwrap();

        let (status, body) = ctx
            .send(
                Method::GET,
                "/api/UCSBDiningCommonsMenuItem/all",
                Some(&ctx.token(&[Role::User])),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_accepts_minute_precision_timestamps() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/articles/post?title=t&url=u&explanation=e&email=a@ucsb.edu&dateAdded=2022-01-03T00:00",
                Some(&ctx.admin_token()),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dateAdded"], "2022-01-03T00:00:00");
    }

    #[tokio::test]
    async fn update_ignores_a_null_body_id() {
        let ctx = TestContext::new();
        ctx.store.articles.save(article(1)).await.unwrap();

        let (status, body) = ctx
            .send(
                Method::PUT,
                "/api/articles?id=1",
                Some(&ctx.admin_token()),
                Some(json!({
                    "id": null,
                    "title": "renamed",
                    "url": "url1.test",
                    "explanation": "test explanation 1",
                    "email": "tesmail1@ucsb.edu",
                    "dateAdded": "2022-01-05T08:15"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["title"], "renamed");
        assert_eq!(body["dateAdded"], "2022-01-05T08:15:00");
    }
}
