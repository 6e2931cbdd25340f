/**
 * Authentication Middleware
 *
 * Protects the REST routes with the same credential rules as the socket
 * endpoint. The bearer token is checked, its subject is resolved through
 * the user directory, and the resulting `PublicUser` is attached to the
 * request for handlers to extract with `AuthUser`.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::{authenticate, bearer_token, AuthError};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::PublicUser;

/// Authenticated user attached to request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub PublicUser);

/// Bearer token from the `Authorization` header, if any
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
}

/// Authentication middleware
///
/// Returns 401 with a JSON body distinguishing a missing credential from
/// an invalid or expired one.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = token_from_headers(request.headers()).map(str::to_owned);
    let user = match authenticate(state.directory.as_ref(), &state.config.jwt_secret, token.as_deref()).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("[Auth] Rejected {} {}: {}", request.method(), request.uri().path(), e);
            return Err(e);
        }
    };

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Requires `auth_middleware` on the route.
#[derive(Clone, Debug)]
pub struct AuthUser(pub PublicUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .map(|authenticated| AuthUser(authenticated.0.clone()))
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                BackendError::Unauthorized(AuthError::MissingCredential)
            })
    }
}
