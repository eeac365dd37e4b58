//! Auth Gate
//!
//! Middleware that resolves a bearer token to a live user and attaches an
//! `Identity` to the request. Downstream guards are extractors over that
//! identity and never re-verify the token or touch storage.

use crate::auth::models::Identity;
use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_owned)
        .ok_or(ApiError::Unauthenticated("Missing token"))?;

    let claims = state
        .jwt
        .verify(&token)
        .map_err(|_| ApiError::Unauthenticated("Invalid or expired token"))?;

    // Tokens outlive account changes, so the user is re-resolved on every
    // request. The admin flag is taken from the live row, not the claim.
    let user = state
        .users
        .get_by_id(claims.sub)?
        .ok_or(ApiError::Unauthenticated("Invalid token (user not found)"))?;

    req.extensions_mut().insert(Identity::from_user(&user));

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(ApiError::Unauthenticated("Missing token"))
    }
}

/// Admin gate: a pure predicate over the already-attached identity.
pub struct AdminIdentity(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if !identity.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(Self(identity))
    }
}
