pub mod payments;
pub mod services;
pub mod users;

use std::sync::Arc;

use axum::response::IntoResponse;
use utoipa_axum::router::OpenApiRouter;

use crate::common::{
    app_error::StdResponse, app_state::AppState, auth::TokenVerifier, middleware,
};

/// Every route of the service. Protected routers are merged first and share
/// one auth layer; public routes are added after it so the layer skips them.
pub fn routes_with_openapi(verifier: Arc<TokenVerifier>) -> OpenApiRouter<AppState> {
    let protected = users::routes_with_openapi()
        .merge(payments::routes_with_openapi())
        .route_layer(axum::middleware::from_fn_with_state(
            verifier,
            middleware::users_authorization,
        ));

    OpenApiRouter::new()
        .routes(utoipa_axum::routes!(health))
        .merge(services::routes_with_openapi())
        .merge(protected)
}

#[utoipa::path(
    get,
    path = "/health",
    tags = ["Health"],
    responses(
        (status = 200, description = "Service is up", body = StdResponse<String, String>)
    )
)]
async fn health() -> impl IntoResponse {
    StdResponse::<&str, String> {
        data: Some("ok"),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::common::{
        auth::tests::{SECRET, auth_config},
        config, db,
    };

    fn app() -> axum::Router {
        let config = config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/unused".into()),
            "AUTH_JWT_SECRET" => Some(SECRET.into()),
            _ => None,
        })
        .unwrap();
        // Nothing here reaches the database; the pool never connects.
        let state = AppState::with_pool(config, db::lazy_pool("postgres://localhost/unused")).unwrap();

        let verifier = Arc::new(TokenVerifier::new(&auth_config(None)));
        let (router, _) = routes_with_openapi(verifier).split_for_parts();
        router.with_state(state)
    }

    #[tokio::test]
    async fn catalog_is_public() {
        let response = app()
            .oneshot(Request::builder().uri("/services").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/services/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn every_user_route_is_behind_the_gate() {
        for (method, uri) in [
            ("GET", "/cart"),
            ("POST", "/cart"),
            ("DELETE", "/cart/00000000-0000-0000-0000-000000000000"),
            ("POST", "/api/razorpay/create-order"),
            ("POST", "/api/paypal/capture-order"),
            ("GET", "/history"),
            ("GET", "/orders/00000000-0000-0000-0000-000000000000"),
            ("GET", "/profile"),
            ("POST", "/feedback"),
            ("POST", "/users/me"),
        ] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn browser_visit_to_history_redirects_to_login() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/history")
                    .header(header::ACCEPT, "text/html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
