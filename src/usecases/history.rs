use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::app_error::AppError,
    models::{HistoryEntry, OrderEntity},
    repositories::OrderRepository,
};

pub struct HistoryUseCase<T>
where
    T: OrderRepository + Send + Sync,
{
    order_repository: Arc<T>,
}

impl<T> HistoryUseCase<T>
where
    T: OrderRepository + Send + Sync,
{
    pub fn new(order_repository: Arc<T>) -> Self {
        Self { order_repository }
    }

    /// Every order the user opened, newest first, whatever its status.
    pub async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>, AppError> {
        let orders = self.order_repository.list_orders(user_id).await?;
        Ok(orders.iter().map(HistoryEntry::from).collect())
    }

    pub async fn get(&self, user_id: &str, order_id: Uuid) -> Result<HistoryEntry, AppError> {
        let order = self.get_order(user_id, order_id).await?;
        Ok(HistoryEntry::from(&order))
    }

    pub async fn get_order(&self, user_id: &str, order_id: Uuid) -> Result<OrderEntity, AppError> {
        let order = self
            .order_repository
            .find_order(order_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if order.user_id != user_id {
            return Err(AppError::ForbiddenResource(
                "This order doesn't belong to you".into(),
            ));
        }

        Ok(order)
    }
}
