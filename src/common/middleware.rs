use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::{app_error::AppError, auth::TokenVerifier};

/// Auth gate shared by every protected router.
///
/// Verifies the bearer token and inserts the resulting
/// [`AuthUser`](super::auth::AuthUser) into request extensions. Browser
/// navigations without a valid session are redirected to the login page,
/// API callers get `401`.
pub async fn users_authorization(
    State(verifier): State<Arc<TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = bearer_token(req.headers()).and_then(|token| verifier.verify(token));

    match outcome {
        Ok(user) => {
            tracing::debug!(user_id = %user.user_id, "Authenticated request");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(path = %req.uri().path(), error = %err, "Rejected unauthenticated request");
            if wants_html(req.headers()) {
                Redirect::to(verifier.login_path()).into_response()
            } else {
                err.into_response()
            }
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".into()))
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
