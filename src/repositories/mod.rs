//! Persistence seams. Each trait has a PostgreSQL implementation next to it;
//! use cases only ever see the trait.

pub mod accounts;
pub mod carts;
pub mod orders;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::models::{
    CartItemEntity, CreateCartItemEntity, CreateFeedbackEntity, CreateOrderEntity,
    CreateUserEntity, FeedbackEntity, OrderEntity, OrderItem, ProfileEntity, UserEntity,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartRepository {
    async fn add_item(&self, item: CreateCartItemEntity) -> Result<CartItemEntity>;
    /// Rows owned by `user_id`, oldest first.
    async fn list_items(&self, user_id: &str) -> Result<Vec<CartItemEntity>>;
    /// Deletes the row only if `user_id` owns it. `None` when nothing matched.
    async fn remove_item(&self, user_id: &str, item_id: Uuid) -> Result<Option<CartItemEntity>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository {
    async fn create_order(&self, order: CreateOrderEntity) -> Result<OrderEntity>;
    async fn find_order(&self, id: Uuid) -> Result<Option<OrderEntity>>;
    async fn find_by_provider_order_id(&self, provider_order_id: &str)
    -> Result<Option<OrderEntity>>;
    /// Newest first.
    async fn list_orders(&self, user_id: &str) -> Result<Vec<OrderEntity>>;
    /// Flips a pending order to completed, stores the final item snapshot and
    /// deletes the cart rows those items were paid from, in one transaction.
    /// `None` when the order was no longer pending.
    async fn complete_order(
        &self,
        id: Uuid,
        provider_payment_id: Option<String>,
        items: Vec<OrderItem>,
    ) -> Result<Option<OrderEntity>>;
    /// Flips a pending order to failed. `None` when the order was no longer pending.
    async fn fail_order(&self, id: Uuid, reason: String) -> Result<Option<OrderEntity>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepository {
    /// Inserts the user document unless it already exists, then returns the stored row.
    async fn sync_user(&self, user: CreateUserEntity) -> Result<UserEntity>;
    async fn find_profile(&self, user_id: &str) -> Result<Option<ProfileEntity>>;
    async fn upsert_profile(&self, profile: ProfileEntity) -> Result<ProfileEntity>;
    async fn create_feedback(&self, feedback: CreateFeedbackEntity) -> Result<FeedbackEntity>;
}
