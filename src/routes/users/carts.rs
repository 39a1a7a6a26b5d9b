use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::{
    common::{
        app_error::{AppError, StdResponse},
        app_state::AppState,
        auth::AuthUser,
    },
    models::CartItemEntity,
    usecases::carts::{CartSummary, CartUseCase},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(utoipa_axum::routes!(get_cart, add_to_cart))
        .routes(utoipa_axum::routes!(remove_from_cart))
}

/// The current user's cart rows with their total.
#[utoipa::path(
    get,
    path = "/cart",
    tags = ["Cart"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Cart contents", body = StdResponse<CartSummary, String>)
    )
)]
async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let summary = CartUseCase::new(state.carts.clone())
        .summary(&user.user_id)
        .await?;

    Ok(StdResponse::<CartSummary, String> {
        data: Some(summary),
        message: None,
    })
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct AddToCartReq {
    service_id: String,
}

/// Add one service from the catalog. Adding the same service again adds another row.
#[utoipa::path(
    post,
    path = "/cart",
    tags = ["Cart"],
    security(("bearerAuth" = [])),
    request_body = AddToCartReq,
    responses(
        (status = 200, description = "Service added", body = StdResponse<CartItemEntity, String>),
        (status = 404, description = "Unknown service")
    )
)]
async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddToCartReq>,
) -> Result<impl IntoResponse, AppError> {
    let item = CartUseCase::new(state.carts.clone())
        .add_service(&user.user_id, &payload.service_id)
        .await?;

    Ok(StdResponse {
        data: Some(item),
        message: Some("Added to cart"),
    })
}

#[utoipa::path(
    delete,
    path = "/cart/{id}",
    tags = ["Cart"],
    security(("bearerAuth" = [])),
    params(
        ("id" = Uuid, Path, description = "Cart row to remove")
    ),
    responses(
        (status = 200, description = "Row removed", body = StdResponse<CartItemEntity, String>),
        (status = 404, description = "No such row in the user's cart")
    )
)]
async fn remove_from_cart(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let removed = CartUseCase::new(state.carts.clone())
        .remove_item(&user.user_id, id)
        .await?;

    Ok(StdResponse {
        data: Some(removed),
        message: Some("Removed from cart"),
    })
}
