//! Routes that act on the signed-in user's own data. All of them sit behind the auth gate.

pub mod carts;
pub mod history;
pub mod profile;

use utoipa_axum::router::OpenApiRouter;

use crate::common::app_state::AppState;

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(carts::routes_with_openapi())
        .merge(history::routes_with_openapi())
        .merge(profile::routes_with_openapi())
}
