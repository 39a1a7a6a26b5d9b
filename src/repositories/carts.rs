use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::CartRepository;
use crate::{
    common::aliases::DbPool,
    models::{CartItemEntity, CreateCartItemEntity},
    schema::cart,
};

pub struct PgCartRepository {
    db_pool: DbPool,
}

impl PgCartRepository {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn add_item(&self, item: CreateCartItemEntity) -> Result<CartItemEntity> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::insert_into(cart::table)
            .values(item)
            .returning(CartItemEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to add cart item")
    }

    async fn list_items(&self, user_id: &str) -> Result<Vec<CartItemEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        cart::table
            .filter(cart::user_id.eq(user_id))
            .order_by(cart::created_at.asc())
            .select(CartItemEntity::as_select())
            .get_results(conn)
            .await
            .context("Failed to get cart items")
    }

    async fn remove_item(&self, user_id: &str, item_id: Uuid) -> Result<Option<CartItemEntity>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::delete(
            cart::table
                .filter(cart::id.eq(item_id))
                .filter(cart::user_id.eq(user_id)),
        )
        .returning(CartItemEntity::as_returning())
        .get_result(conn)
        .await
        .optional()
        .context("Failed to remove cart item")
    }
}
