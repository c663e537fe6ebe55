//! Bearer-token middleware and the `CurrentUser` extractor.
//!
//! ```text
//! Request → auth_middleware → AuthUser in extensions → handler(CurrentUser(user))
//! ```
//!
//! A request without an `Authorization` header passes through untouched; handlers that
//! take `CurrentUser` reject it with 401. A header that fails to resolve is rejected here.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let Some(token) = token else {
        return next.run(request).await;
    };

    match state.identity.resolve(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            AppError::Auth(e).into_response()
        }
    }
}

/// The signed-in user. Rejects with 401 when the request carried no valid token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}
