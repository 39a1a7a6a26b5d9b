use axum::{extract::Path, response::IntoResponse};
use utoipa_axum::router::OpenApiRouter;

use crate::{
    catalog::{self, Service},
    common::{
        app_error::{AppError, StdResponse},
        app_state::AppState,
    },
};

/// Catalog routes. Public, so visitors can browse before signing in.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(utoipa_axum::routes!(get_services))
        .routes(utoipa_axum::routes!(get_service))
}

#[utoipa::path(
    get,
    path = "/services",
    tags = ["Services"],
    responses(
        (status = 200, description = "All bookable services", body = StdResponse<Vec<Service>, String>)
    )
)]
async fn get_services() -> impl IntoResponse {
    StdResponse::<&[Service], String> {
        data: Some(catalog::all()),
        message: None,
    }
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tags = ["Services"],
    params(
        ("id" = String, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "One service", body = StdResponse<Service, String>),
        (status = 404, description = "Unknown service")
    )
)]
async fn get_service(Path(id): Path<String>) -> Result<impl IntoResponse, AppError> {
    let service = catalog::find(&id).ok_or(AppError::NotFound)?;

    Ok(StdResponse::<&Service, String> {
        data: Some(service),
        message: None,
    })
}
