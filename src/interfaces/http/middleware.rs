//! Authentication middleware for Axum
//!
//! `auth_middleware` resolves the bearer token into a [`Principal`] and
//! stores it in the request extensions. `require_admin` and
//! `require_customer` are layered inside it to gate routes by principal
//! kind.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::ApiError;
use super::router::AppState;
use crate::domain::{DomainError, Principal, PrincipalKind};

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthorized(message: &str) -> Response {
    ApiError(DomainError::Unauthorized(message.to_string())).into_response()
}

/// JWT bearer authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return unauthorized("Missing authentication token");
    };

    let Some(token) = extract_token(auth_header) else {
        return unauthorized("Invalid authentication token");
    };

    match state.identity.authenticate(token) {
        Ok(principal) => {
            debug!("Authenticated {} {}", principal.kind, principal.user_id);
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}

async fn require_kind(kind: PrincipalKind, request: Request, next: Next) -> Response {
    match request.extensions().get::<Principal>() {
        Some(principal) if principal.kind == kind => next.run(request).await,
        Some(_) => ApiError(DomainError::Forbidden(format!(
            "This action requires a {} account",
            kind
        )))
        .into_response(),
        None => unauthorized("Missing authentication token"),
    }
}

pub async fn require_admin(request: Request, next: Next) -> Response {
    require_kind(PrincipalKind::Admin, request, next).await
}

pub async fn require_customer(request: Request, next: Next) -> Response {
    require_kind(PrincipalKind::Customer, request, next).await
}
