use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::{
    common::{
        app_error::{AppError, StdResponse},
        app_state::AppState,
        auth::AuthUser,
    },
    payments::PaymentProvider,
    usecases::checkout::{
        CheckoutUseCase, DeliverySchedule, ItemDeliveryTime, OpenCheckout, SettleCheckout,
    },
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest(
        "/api",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(create_order))
            .routes(utoipa_axum::routes!(capture_order)),
    )
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
struct CreateOrderReq {
    /// Total the client displayed, checked against the cart.
    amount: Option<i64>,
    currency: Option<String>,
    description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRes {
    id: Uuid,
    /// Provider order ID the client widget is opened with.
    order_id: String,
    amount: i64,
    currency: String,
    key_id: Option<String>,
}

/// Open a provider order for the current cart and record it as pending.
#[utoipa::path(
    post,
    path = "/{provider}/create-order",
    tags = ["Payments"],
    security(("bearerAuth" = [])),
    params(
        ("provider" = PaymentProvider, Path, description = "razorpay or paypal")
    ),
    request_body = CreateOrderReq,
    responses(
        (status = 200, description = "Order opened", body = StdResponse<CreateOrderRes, String>),
        (status = 400, description = "Empty cart, amount mismatch or provider disabled"),
        (status = 502, description = "Provider unreachable")
    )
)]
async fn create_order(
    Path(provider): Path<PaymentProvider>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Option<Json<CreateOrderReq>>,
) -> Result<impl IntoResponse, AppError> {
    let gateway = state.gateways.get(provider)?;
    let Json(payload) = payload.unwrap_or_default();

    let opened = CheckoutUseCase::new(state.carts.clone(), state.orders.clone())
        .open(
            &user.user_id,
            gateway.as_ref(),
            OpenCheckout {
                amount: payload.amount,
                currency: payload
                    .currency
                    .unwrap_or_else(|| state.config.default_currency.clone()),
                description: payload.description,
            },
        )
        .await?;

    Ok(StdResponse {
        data: Some(CreateOrderRes {
            id: opened.order.id,
            order_id: opened.order.provider_order_id,
            amount: opened.order.total_amount,
            currency: opened.order.currency,
            key_id: opened.public_key,
        }),
        message: Some("Order created"),
    })
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CaptureOrderReq {
    order_id: String,
    payment_id: Option<String>,
    signature: Option<String>,
    /// Delivery day for every item, `YYYY-MM-DD` or an ISO timestamp.
    delivery_date: Option<String>,
    #[serde(default)]
    delivery_times: Vec<ItemDeliveryTime>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CaptureOrderRes {
    status: String,
    order_id: String,
}

/// Confirm the approved payment with the provider and settle the order.
#[utoipa::path(
    post,
    path = "/{provider}/capture-order",
    tags = ["Payments"],
    security(("bearerAuth" = [])),
    params(
        ("provider" = PaymentProvider, Path, description = "razorpay or paypal")
    ),
    request_body = CaptureOrderReq,
    responses(
        (status = 200, description = "Payment captured, cart cleared", body = StdResponse<CaptureOrderRes, String>),
        (status = 400, description = "Missing paymentId, bad delivery slot or provider disabled"),
        (status = 402, description = "Payment verification failed"),
        (status = 403, description = "Order belongs to another user"),
        (status = 409, description = "Order already settled")
    )
)]
async fn capture_order(
    Path(provider): Path<PaymentProvider>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CaptureOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    let gateway = state.gateways.get(provider)?;

    let order = CheckoutUseCase::new(state.carts.clone(), state.orders.clone())
        .settle(
            &user.user_id,
            gateway.as_ref(),
            SettleCheckout {
                provider_order_id: payload.order_id,
                payment_id: payload.payment_id,
                signature: payload.signature,
                delivery: DeliverySchedule {
                    date: payload.delivery_date,
                    times: payload.delivery_times,
                },
            },
        )
        .await?;

    Ok(StdResponse {
        data: Some(CaptureOrderRes {
            status: order.status,
            order_id: order.provider_order_id,
        }),
        message: Some("Payment successful"),
    })
}
