use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{Claims, JwtKeys, Role};
use crate::error::ApiError;

/// Authenticated caller, injected into request extensions once the gate passes
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

/// Middleware state: the role an endpoint requires and the keys to check tokens with
#[derive(Clone)]
pub struct RoleGate {
    required: Role,
    keys: Arc<JwtKeys>,
}

impl RoleGate {
    pub fn new(required: Role, keys: Arc<JwtKeys>) -> Self {
        Self { required, keys }
    }
}

/// Rejects the request with a bare 403 unless it carries a valid bearer token
/// holding the gate's role. Runs before any extractor of the wrapped handler.
pub async fn require_role(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::debug!("{} {} denied: {}", request.method(), request.uri().path(), msg);
        ApiError::Forbidden
    })?;

    let claims = gate.keys.validate(&token).map_err(|e| {
        tracing::warn!("{} {} denied: {}", request.method(), request.uri().path(), e);
        ApiError::Forbidden
    })?;

    if !claims.has_role(gate.required) {
        tracing::warn!(
            "{} {} denied: '{}' lacks {}",
            request.method(),
            request.uri().path(),
            claims.sub,
            gate.required
        );
        return Err(ApiError::Forbidden);
    }

    tracing::debug!("'{}' passed {} gate", claims.sub, gate.required);
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
