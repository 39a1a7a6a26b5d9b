use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::{
    common::{
        app_error::{AppError, StdResponse},
        app_state::AppState,
        auth::AuthUser,
    },
    models::{HistoryEntry, OrderEntity},
    usecases::history::HistoryUseCase,
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(utoipa_axum::routes!(get_history))
        .routes(utoipa_axum::routes!(get_history_entry))
        .routes(utoipa_axum::routes!(get_order))
}

/// Every order the user has opened, newest first.
#[utoipa::path(
    get,
    path = "/history",
    tags = ["History"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Order history", body = StdResponse<Vec<HistoryEntry>, String>)
    )
)]
async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let history = HistoryUseCase::new(state.orders.clone())
        .list(&user.user_id)
        .await?;

    Ok(StdResponse::<Vec<HistoryEntry>, String> {
        data: Some(history),
        message: None,
    })
}

#[utoipa::path(
    get,
    path = "/history/{id}",
    tags = ["History"],
    security(("bearerAuth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "History entry", body = StdResponse<HistoryEntry, String>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found")
    )
)]
async fn get_history_entry(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let entry = HistoryUseCase::new(state.orders.clone())
        .get(&user.user_id, id)
        .await?;

    Ok(StdResponse::<HistoryEntry, String> {
        data: Some(entry),
        message: None,
    })
}

/// The full payment-tracking record behind a history entry.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tags = ["History"],
    security(("bearerAuth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order", body = StdResponse<OrderEntity, String>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found")
    )
)]
async fn get_order(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let order = HistoryUseCase::new(state.orders.clone())
        .get_order(&user.user_id, id)
        .await?;

    Ok(StdResponse::<OrderEntity, String> {
        data: Some(order),
        message: None,
    })
}
