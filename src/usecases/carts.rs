use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog,
    common::app_error::AppError,
    models::{CartItemEntity, CreateCartItemEntity},
    repositories::CartRepository,
};

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItemEntity>,
    pub total_amount: i64,
}

pub fn cart_total(items: &[CartItemEntity]) -> i64 {
    items.iter().map(|item| item.price).sum()
}

pub struct CartUseCase<T>
where
    T: CartRepository + Send + Sync,
{
    cart_repository: Arc<T>,
}

impl<T> CartUseCase<T>
where
    T: CartRepository + Send + Sync,
{
    pub fn new(cart_repository: Arc<T>) -> Self {
        Self { cart_repository }
    }

    /// Adds one row for the service. Repeated adds of the same service create
    /// separate rows, each billed and removable on its own.
    pub async fn add_service(
        &self,
        user_id: &str,
        service_id: &str,
    ) -> Result<CartItemEntity, AppError> {
        let service = catalog::find(service_id).ok_or(AppError::NotFound)?;

        let item = self
            .cart_repository
            .add_item(CreateCartItemEntity {
                user_id: user_id.to_string(),
                service_id: service.id.to_string(),
                name: service.name.to_string(),
                price: service.price,
            })
            .await?;

        tracing::info!(user_id, service_id, cart_item_id = %item.id, "Service added to cart");
        Ok(item)
    }

    pub async fn summary(&self, user_id: &str) -> Result<CartSummary, AppError> {
        let items = self.cart_repository.list_items(user_id).await?;
        let total_amount = cart_total(&items);
        Ok(CartSummary {
            items,
            total_amount,
        })
    }

    pub async fn remove_item(
        &self,
        user_id: &str,
        item_id: Uuid,
    ) -> Result<CartItemEntity, AppError> {
        let removed = self
            .cart_repository
            .remove_item(user_id, item_id)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(user_id, cart_item_id = %item_id, "Item removed from cart");
        Ok(removed)
    }
}
