//! Turns a cart into a paid order.
//!
//! `open` prices the cart, opens an order with the payment provider and
//! records it locally as `pending`. The client then shows the provider's
//! widget and, once the customer approves, calls `settle`, which confirms the
//! payment with the provider and moves the order to `completed` (deleting the
//! paid cart rows in the same transaction) or `failed` (leaving the cart alone).
//! The delivery slot chosen on the payment page is validated before the
//! provider is asked and stored on the items when the order completes.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::carts::cart_total;
use crate::{
    common::app_error::AppError,
    models::{CreateOrderEntity, OrderEntity, OrderItem, OrderStatus},
    payments::{CaptureOutcome, CaptureRequest, CreateProviderOrder, PaymentGateway},
    repositories::{CartRepository, OrderRepository},
};

#[derive(Debug, Clone)]
pub struct OpenCheckout {
    /// Amount the client displayed; must match the cart total when present.
    pub amount: Option<i64>,
    pub currency: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenedCheckout {
    pub order: OrderEntity,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SettleCheckout {
    pub provider_order_id: String,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub delivery: DeliverySchedule,
}

/// Delivery slot the customer picked on the payment page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliverySchedule {
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; applies to every item.
    pub date: Option<String>,
    pub times: Vec<ItemDeliveryTime>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDeliveryTime {
    pub cart_item_id: Uuid,
    /// `HH:MM` or `HH:MM:SS`.
    pub time: String,
}

fn parse_delivery_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|at| at.date_naive()))
        .map_err(|_| AppError::BadRequest(format!("{raw} is not a valid delivery date")))
}

fn parse_delivery_time(raw: &str) -> Result<NaiveTime, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::BadRequest(format!("{raw} is not a valid delivery time")))
}

/// Applies the schedule to the order's items. Every time must name an item of the order.
fn schedule_items(
    mut items: Vec<OrderItem>,
    schedule: &DeliverySchedule,
) -> Result<Vec<OrderItem>, AppError> {
    if let Some(raw) = &schedule.date {
        let date = parse_delivery_date(raw)?;
        for item in &mut items {
            item.delivery_date = Some(date);
        }
    }

    for slot in &schedule.times {
        let time = parse_delivery_time(&slot.time)?;
        let item = items
            .iter_mut()
            .find(|item| item.cart_item_id == slot.cart_item_id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Item {} is not part of this order", slot.cart_item_id))
            })?;
        item.delivery_time = Some(time);
    }

    Ok(items)
}

fn normalize_currency(currency: &str) -> Result<String, AppError> {
    let currency = currency.trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::BadRequest(format!(
            "{currency} is not a valid currency code"
        )));
    }
    Ok(currency)
}

pub struct CheckoutUseCase<C, O>
where
    C: CartRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
{
    cart_repository: Arc<C>,
    order_repository: Arc<O>,
}

impl<C, O> CheckoutUseCase<C, O>
where
    C: CartRepository + Send + Sync,
    O: OrderRepository + Send + Sync,
{
    pub fn new(cart_repository: Arc<C>, order_repository: Arc<O>) -> Self {
        Self {
            cart_repository,
            order_repository,
        }
    }

    pub async fn open(
        &self,
        user_id: &str,
        gateway: &dyn PaymentGateway,
        request: OpenCheckout,
    ) -> Result<OpenedCheckout, AppError> {
        let items = self.cart_repository.list_items(user_id).await?;
        if items.is_empty() {
            return Err(AppError::BadRequest("Cart is empty".into()));
        }

        let total = cart_total(&items);
        if let Some(amount) = request.amount {
            if amount != total {
                return Err(AppError::BadRequest(format!(
                    "Amount {amount} does not match cart total {total}"
                )));
            }
        }

        let currency = normalize_currency(&request.currency)?;
        let provider = gateway.provider();

        let provider_order = gateway
            .create_order(CreateProviderOrder {
                amount: total,
                currency: currency.clone(),
                description: request
                    .description
                    .unwrap_or_else(|| format!("{} elder-care service(s)", items.len())),
                receipt: format!("order_{}", Utc::now().timestamp_millis()),
            })
            .await
            .map_err(|err| {
                error!(provider = %provider, error = ?err, "Failed to create payment order");
                AppError::ServiceUnreachable(provider.display_name().into())
            })?;

        let snapshot: Vec<OrderItem> = items.iter().map(OrderItem::from).collect();
        let order = self
            .order_repository
            .create_order(CreateOrderEntity {
                user_id: user_id.to_string(),
                items: serde_json::to_value(&snapshot)
                    .map_err(|err| AppError::Other(err.into()))?,
                total_amount: total,
                currency,
                status: OrderStatus::Pending.as_str().into(),
                provider: provider.as_str().into(),
                provider_order_id: provider_order.id,
            })
            .await?;

        info!(
            user_id,
            order_id = %order.id,
            provider = %provider,
            provider_order_id = %order.provider_order_id,
            total,
            "Checkout opened"
        );

        Ok(OpenedCheckout {
            order,
            public_key: gateway.public_key(),
        })
    }

    pub async fn settle(
        &self,
        user_id: &str,
        gateway: &dyn PaymentGateway,
        request: SettleCheckout,
    ) -> Result<OrderEntity, AppError> {
        let provider = gateway.provider();

        let payment_id = request.payment_id.filter(|id| !id.trim().is_empty());
        if payment_id.is_none() && gateway.requires_payment_id() {
            return Err(AppError::BadRequest(format!(
                "paymentId is required for {}",
                provider.display_name()
            )));
        }

        let order = self
            .order_repository
            .find_by_provider_order_id(&request.provider_order_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if order.user_id != user_id {
            return Err(AppError::ForbiddenResource(
                "This order doesn't belong to you".into(),
            ));
        }
        if order.provider != provider.as_str() {
            return Err(AppError::BadRequest(format!(
                "Order was not placed with {}",
                provider.display_name()
            )));
        }
        if !order.is_pending() {
            return Err(AppError::Conflict(format!("Order is already {}", order.status)));
        }

        let items = schedule_items(order.order_items(), &request.delivery)?;

        let outcome = gateway
            .capture(CaptureRequest {
                provider_order_id: request.provider_order_id,
                payment_id,
                signature: request.signature,
            })
            .await;

        let reason = match outcome {
            Ok(CaptureOutcome::Captured { payment_id }) => {
                return self.complete(order, payment_id, items).await;
            }
            Ok(CaptureOutcome::Rejected { reason }) => reason,
            Err(err) => {
                warn!(order_id = %order.id, provider = %provider, error = ?err, "Payment capture errored");
                format!("Capture failed: {err}")
            }
        };

        match self.order_repository.fail_order(order.id, reason.clone()).await {
            Ok(Some(_)) => info!(order_id = %order.id, reason = %reason, "Order marked failed"),
            Ok(None) => warn!(order_id = %order.id, "Order left pending state before it could be failed"),
            Err(err) => error!(order_id = %order.id, error = ?err, "Failed to record payment failure"),
        }

        Err(AppError::PaymentFailed(reason))
    }

    async fn complete(
        &self,
        order: OrderEntity,
        payment_id: String,
        items: Vec<OrderItem>,
    ) -> Result<OrderEntity, AppError> {
        match self
            .order_repository
            .complete_order(order.id, Some(payment_id.clone()), items)
            .await
        {
            Ok(Some(completed)) => {
                info!(
                    order_id = %completed.id,
                    provider_payment_id = %payment_id,
                    "Order completed and cart cleared"
                );
                Ok(completed)
            }
            Ok(None) => Err(AppError::Conflict(
                "Order was settled by another request".into(),
            )),
            Err(err) => {
                // The provider holds the money but the ledger does not say so.
                error!(
                    order_id = %order.id,
                    provider_order_id = %order.provider_order_id,
                    provider_payment_id = %payment_id,
                    error = ?err,
                    "Payment captured but order could not be completed"
                );
                Err(AppError::Other(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::{always, eq};
    use uuid::Uuid;

    use super::*;
    use crate::{
        models::CartItemEntity,
        payments::{MockPaymentGateway, PaymentProvider, ProviderOrder},
        repositories::{MockCartRepository, MockOrderRepository},
    };

    fn cart_row(user_id: &str, service_id: &str, price: i64) -> CartItemEntity {
        CartItemEntity {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            service_id: service_id.into(),
            name: format!("service {service_id}"),
            price,
            created_at: Utc::now(),
        }
    }

    const PAID_ROW: Uuid = Uuid::from_u128(7);

    fn order_with(user_id: &str, status: OrderStatus, provider: PaymentProvider) -> OrderEntity {
        let now = Utc::now();
        OrderEntity {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            items: serde_json::json!([
                {"cartItemId": PAID_ROW, "serviceId": "2", "name": "Book Full Health Checkup", "price": 1200}
            ]),
            total_amount: 1700,
            currency: "INR".into(),
            status: status.as_str().into(),
            provider: provider.as_str().into(),
            provider_order_id: "order_abc".into(),
            provider_payment_id: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn razorpay() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_provider()
            .return_const(PaymentProvider::Razorpay);
        gateway
            .expect_public_key()
            .return_const(Some("rzp_test_key".to_string()));
        gateway.expect_requires_payment_id().return_const(true);
        gateway
    }

    fn open_request(amount: Option<i64>) -> OpenCheckout {
        OpenCheckout {
            amount,
            currency: "inr".into(),
            description: None,
        }
    }

    fn settle_request() -> SettleCheckout {
        SettleCheckout {
            provider_order_id: "order_abc".into(),
            payment_id: Some("pay_1".into()),
            signature: None,
            delivery: DeliverySchedule::default(),
        }
    }

    fn usecase(
        carts: MockCartRepository,
        orders: MockOrderRepository,
    ) -> CheckoutUseCase<MockCartRepository, MockOrderRepository> {
        CheckoutUseCase::new(Arc::new(carts), Arc::new(orders))
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_checked_out() {
        let mut carts = MockCartRepository::new();
        carts.expect_list_items().returning(|_| Ok(vec![]));

        let err = usecase(carts, MockOrderRepository::new())
            .open("u1", &razorpay(), open_request(None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn client_amount_must_match_cart_total() {
        let mut carts = MockCartRepository::new();
        carts
            .expect_list_items()
            .returning(|_| Ok(vec![cart_row("u1", "1", 500), cart_row("u1", "2", 1200)]));

        let err = usecase(carts, MockOrderRepository::new())
            .open("u1", &razorpay(), open_request(Some(500)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn opening_records_a_pending_order_for_the_cart_total() {
        let mut carts = MockCartRepository::new();
        carts
            .expect_list_items()
            .with(eq("u1"))
            .returning(|_| Ok(vec![cart_row("u1", "1", 500), cart_row("u1", "2", 1200)]));

        let mut gateway = razorpay();
        gateway
            .expect_create_order()
            .withf(|request| request.amount == 1700 && request.currency == "INR")
            .times(1)
            .returning(|_| {
                Ok(ProviderOrder {
                    id: "order_abc".into(),
                })
            });

        let mut orders = MockOrderRepository::new();
        orders
            .expect_create_order()
            .withf(|order| {
                order.user_id == "u1"
                    && order.total_amount == 1700
                    && order.status == "pending"
                    && order.provider == "razorpay"
                    && order.provider_order_id == "order_abc"
                    && order.items.as_array().map(Vec::len) == Some(2)
            })
            .times(1)
            .returning(|_| Ok(order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay)));

        let opened = usecase(carts, orders)
            .open("u1", &gateway, open_request(Some(1700)))
            .await
            .unwrap();

        assert_eq!(opened.order.provider_order_id, "order_abc");
        assert_eq!(opened.public_key.as_deref(), Some("rzp_test_key"));
    }

    #[tokio::test]
    async fn provider_outage_does_not_record_an_order() {
        let mut carts = MockCartRepository::new();
        carts
            .expect_list_items()
            .returning(|_| Ok(vec![cart_row("u1", "3", 300)]));

        let mut gateway = razorpay();
        gateway
            .expect_create_order()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let mut orders = MockOrderRepository::new();
        orders.expect_create_order().times(0);

        let err = usecase(carts, orders)
            .open("u1", &gateway, open_request(None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ServiceUnreachable(_)));
    }

    #[tokio::test]
    async fn verified_capture_completes_order_once() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay);
        let order_id = pending.id;

        let mut orders = MockOrderRepository::new();
        let found = pending.clone();
        orders
            .expect_find_by_provider_order_id()
            .with(eq("order_abc"))
            .returning(move |_| Ok(Some(found.clone())));
        orders
            .expect_complete_order()
            .with(eq(order_id), eq(Some("pay_1".to_string())), always())
            .times(1)
            .returning(move |_, payment_id, _| {
                let mut completed = pending.clone();
                completed.status = OrderStatus::Completed.as_str().into();
                completed.provider_payment_id = payment_id;
                Ok(Some(completed))
            });
        orders.expect_fail_order().times(0);

        let mut gateway = razorpay();
        gateway.expect_capture().times(1).returning(|_| {
            Ok(CaptureOutcome::Captured {
                payment_id: "pay_1".into(),
            })
        });

        // No cart expectations: the orchestrator never touches cart rows directly.
        let completed = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, settle_request())
            .await
            .unwrap();

        assert_eq!(completed.status, "completed");
        assert_eq!(completed.provider_payment_id.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn razorpay_capture_without_payment_id_leaves_order_pending() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_provider_order_id().times(0);
        orders.expect_complete_order().times(0);
        orders.expect_fail_order().times(0);

        let mut gateway = razorpay();
        gateway.expect_capture().times(0);

        let request = SettleCheckout {
            payment_id: Some("  ".into()),
            ..settle_request()
        };
        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, request)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn paypal_capture_needs_no_payment_id() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Paypal);

        let mut orders = MockOrderRepository::new();
        let found = pending.clone();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(found.clone())));
        orders
            .expect_complete_order()
            .times(1)
            .returning(move |_, payment_id, _| {
                let mut completed = pending.clone();
                completed.status = OrderStatus::Completed.as_str().into();
                completed.provider_payment_id = payment_id;
                Ok(Some(completed))
            });

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_provider()
            .return_const(PaymentProvider::Paypal);
        gateway.expect_requires_payment_id().return_const(false);
        gateway
            .expect_capture()
            .withf(|request| request.payment_id.is_none())
            .returning(|_| {
                Ok(CaptureOutcome::Captured {
                    payment_id: "3C679366HH908993F".into(),
                })
            });

        let request = SettleCheckout {
            payment_id: None,
            ..settle_request()
        };
        let completed = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, request)
            .await
            .unwrap();

        assert_eq!(completed.provider_payment_id.as_deref(), Some("3C679366HH908993F"));
    }

    #[tokio::test]
    async fn delivery_slot_is_stored_on_completed_items() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay);

        let mut orders = MockOrderRepository::new();
        let found = pending.clone();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(found.clone())));
        orders
            .expect_complete_order()
            .withf(|_, _, items| {
                items.len() == 1
                    && items[0].cart_item_id == PAID_ROW
                    && items[0].delivery_date == NaiveDate::from_ymd_opt(2025, 11, 3)
                    && items[0].delivery_time == NaiveTime::from_hms_opt(9, 30, 0)
            })
            .times(1)
            .returning(move |_, _, items| {
                let mut completed = pending.clone();
                completed.status = OrderStatus::Completed.as_str().into();
                completed.items = serde_json::to_value(items).unwrap();
                Ok(Some(completed))
            });

        let mut gateway = razorpay();
        gateway.expect_capture().returning(|_| {
            Ok(CaptureOutcome::Captured {
                payment_id: "pay_1".into(),
            })
        });

        let request = SettleCheckout {
            delivery: DeliverySchedule {
                date: Some("2025-11-03T04:30:00.000Z".into()),
                times: vec![ItemDeliveryTime {
                    cart_item_id: PAID_ROW,
                    time: "09:30".into(),
                }],
            },
            ..settle_request()
        };
        let completed = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, request)
            .await
            .unwrap();

        let items = completed.order_items();
        assert_eq!(items[0].delivery_date, NaiveDate::from_ymd_opt(2025, 11, 3));
    }

    #[tokio::test]
    async fn bad_delivery_slot_is_rejected_before_capture() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(pending.clone())));
        orders.expect_complete_order().times(0);
        orders.expect_fail_order().times(0);

        let mut gateway = razorpay();
        gateway.expect_capture().times(0);

        let usecase = usecase(MockCartRepository::new(), orders);
        for delivery in [
            DeliverySchedule {
                date: None,
                times: vec![ItemDeliveryTime {
                    cart_item_id: Uuid::from_u128(99),
                    time: "09:30".into(),
                }],
            },
            DeliverySchedule {
                date: Some("next tuesday".into()),
                times: vec![],
            },
            DeliverySchedule {
                date: None,
                times: vec![ItemDeliveryTime {
                    cart_item_id: PAID_ROW,
                    time: "25:00".into(),
                }],
            },
        ] {
            let request = SettleCheckout {
                delivery,
                ..settle_request()
            };
            let err = usecase.settle("u1", &gateway, request).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn rejected_capture_marks_order_failed_and_keeps_cart() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay);
        let order_id = pending.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(pending.clone())));
        orders.expect_complete_order().times(0);
        orders
            .expect_fail_order()
            .with(eq(order_id), eq("Payment does not match order ID".to_string()))
            .times(1)
            .returning(|_, _| Ok(None));

        let mut gateway = razorpay();
        gateway.expect_capture().returning(|_| {
            Ok(CaptureOutcome::Rejected {
                reason: "Payment does not match order ID".into(),
            })
        });

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PaymentFailed(_)));
        assert_eq!(err.to_string(), "Payment verification failed");
    }

    #[tokio::test]
    async fn capture_transport_error_marks_order_failed() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(pending.clone())));
        orders.expect_complete_order().times(0);
        orders
            .expect_fail_order()
            .with(always(), always())
            .times(1)
            .returning(|_, _| Ok(None));

        let mut gateway = razorpay();
        gateway
            .expect_capture()
            .returning(|_| Err(anyhow::anyhow!("timed out")));

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PaymentFailed(_)));
    }

    #[tokio::test]
    async fn failure_to_record_failed_status_still_reports_payment_failure() {
        let pending = order_with("u1", OrderStatus::Pending, PaymentProvider::Razorpay);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(pending.clone())));
        orders
            .expect_fail_order()
            .returning(|_, _| Err(anyhow::anyhow!("db down")));

        let mut gateway = razorpay();
        gateway.expect_capture().returning(|_| {
            Ok(CaptureOutcome::Rejected {
                reason: "Payment is failed".into(),
            })
        });

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PaymentFailed(_)));
    }

    #[tokio::test]
    async fn settled_order_is_not_captured_again() {
        let completed = order_with("u1", OrderStatus::Completed, PaymentProvider::Razorpay);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(completed.clone())));

        let mut gateway = razorpay();
        gateway.expect_capture().times(0);

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn another_users_order_is_forbidden() {
        let foreign = order_with("u2", OrderStatus::Pending, PaymentProvider::Razorpay);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(foreign.clone())));

        let mut gateway = razorpay();
        gateway.expect_capture().times(0);

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &gateway, settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ForbiddenResource(_)));
    }

    #[tokio::test]
    async fn order_from_other_provider_is_rejected() {
        let paypal_order = order_with("u1", OrderStatus::Pending, PaymentProvider::Paypal);

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(move |_| Ok(Some(paypal_order.clone())));

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &razorpay(), settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_provider_order_id()
            .returning(|_| Ok(None));

        let err = usecase(MockCartRepository::new(), orders)
            .settle("u1", &razorpay(), settle_request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn delivery_inputs_accept_page_formats() {
        assert_eq!(
            parse_delivery_date("2025-11-03").unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
        );
        assert_eq!(
            parse_delivery_time("18:05:00").unwrap(),
            NaiveTime::from_hms_opt(18, 5, 0).unwrap()
        );
    }

    #[test]
    fn currency_codes_are_normalized() {
        assert_eq!(normalize_currency(" inr ").unwrap(), "INR");
        assert!(normalize_currency("rupees").is_err());
        assert!(normalize_currency("1NR").is_err());
    }
}
