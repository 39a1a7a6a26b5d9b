use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use super::OrderRepository;
use crate::{
    common::aliases::{DbPool, DieselError},
    models::{CreateOrderEntity, OrderEntity, OrderItem, OrderStatus},
    schema::{cart, orders},
};

pub struct PgOrderRepository {
    db_pool: DbPool,
}

impl PgOrderRepository {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, order: CreateOrderEntity) -> Result<OrderEntity> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::insert_into(orders::table)
            .values(order)
            .returning(OrderEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to create order")
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        orders::table
            .find(id)
            .select(OrderEntity::as_select())
            .get_result(conn)
            .await
            .optional()
            .context("Failed to get order")
    }

    async fn find_by_provider_order_id(
        &self,
        provider_order_id: &str,
    ) -> Result<Option<OrderEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        orders::table
            .filter(orders::provider_order_id.eq(provider_order_id))
            .select(OrderEntity::as_select())
            .get_result(conn)
            .await
            .optional()
            .context("Failed to get order by provider order id")
    }

    async fn list_orders(&self, user_id: &str) -> Result<Vec<OrderEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        orders::table
            .filter(orders::user_id.eq(user_id))
            .order_by(orders::created_at.desc())
            .select(OrderEntity::as_select())
            .get_results(conn)
            .await
            .context("Failed to get my orders")
    }

    async fn complete_order(
        &self,
        id: Uuid,
        provider_payment_id: Option<String>,
        items: Vec<OrderItem>,
    ) -> Result<Option<OrderEntity>> {
        let paid_rows: Vec<Uuid> = items.iter().map(|item| item.cart_item_id).collect();
        let items = serde_json::to_value(&items).context("Failed to encode order items")?;

        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        conn.transaction(move |conn| {
            Box::pin(async move {
                let completed: Option<OrderEntity> = diesel::update(
                    orders::table
                        .find(id)
                        .filter(orders::status.eq(OrderStatus::Pending.as_str())),
                )
                .set((
                    orders::status.eq(OrderStatus::Completed.as_str()),
                    orders::provider_payment_id.eq(provider_payment_id),
                    orders::items.eq(items),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .returning(OrderEntity::as_returning())
                .get_result(conn)
                .await
                .optional()?;

                // Rows added after checkout opened were not paid for and stay.
                if let Some(order) = &completed {
                    diesel::delete(
                        cart::table
                            .filter(cart::user_id.eq(&order.user_id))
                            .filter(cart::id.eq_any(paid_rows)),
                    )
                    .execute(conn)
                    .await?;
                }

                Ok::<Option<OrderEntity>, DieselError>(completed)
            })
        })
        .await
        .context("Failed to complete order")
    }

    async fn fail_order(&self, id: Uuid, reason: String) -> Result<Option<OrderEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::update(
            orders::table
                .find(id)
                .filter(orders::status.eq(OrderStatus::Pending.as_str())),
        )
        .set((
            orders::status.eq(OrderStatus::Failed.as_str()),
            orders::failure_reason.eq(reason),
            orders::updated_at.eq(diesel::dsl::now),
        ))
        .returning(OrderEntity::as_returning())
        .get_result(conn)
        .await
        .optional()
        .context("Failed to mark order as failed")
    }
}
