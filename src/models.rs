use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::{
    Selectable,
    prelude::{AsChangeset, Identifiable, Insertable, Queryable},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

// Users

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::users)]
#[diesel(primary_key(uid))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserEntity {
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct CreateUserEntity {
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
}

// Cart

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::cart)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct CartItemEntity {
    pub id: Uuid,
    pub user_id: String,
    pub service_id: String,
    pub name: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::cart)]
pub struct CreateCartItemEntity {
    pub user_id: String,
    pub service_id: String,
    pub name: String,
    pub price: i64,
}

// Orders

/// One line of an order, snapshotted from the cart row it was paid from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Cart row this line came from; settlement deletes exactly these rows.
    pub cart_item_id: Uuid,
    pub service_id: String,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_time: Option<NaiveTime>,
}

impl From<&CartItemEntity> for OrderItem {
    fn from(item: &CartItemEntity) -> Self {
        Self {
            cart_item_id: item.id,
            service_id: item.service_id.clone(),
            name: item.name.clone(),
            price: item.price,
            delivery_date: None,
            delivery_time: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: String,
    pub items: Value,
    pub total_amount: i64,
    pub currency: String,
    pub status: String,
    pub provider: String,
    pub provider_order_id: String,
    pub provider_payment_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderEntity {
    /// Decodes the item snapshot taken when the order was opened.
    /// Rows written by older code paths may not decode; those render as empty.
    pub fn order_items(&self) -> Vec<OrderItem> {
        serde_json::from_value(self.items.clone()).unwrap_or_default()
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending.as_str()
    }
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreateOrderEntity {
    pub user_id: String,
    pub items: Value,
    pub total_amount: i64,
    pub currency: String,
    pub status: String,
    pub provider: String,
    pub provider_order_id: String,
}

/// User-facing receipt, projected from an [`OrderEntity`] on read.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub order_id: Uuid,
    pub provider_order_id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderEntity> for HistoryEntry {
    fn from(order: &OrderEntity) -> Self {
        Self {
            order_id: order.id,
            provider_order_id: order.provider_order_id.clone(),
            user_id: order.user_id.clone(),
            items: order.order_items(),
            total: order.total_amount,
            currency: order.currency.clone(),
            status: order.status.clone(),
            created_at: order.created_at,
        }
    }
}

// Feedback

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntity {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: Option<String>,
    #[diesel(column_name = message)]
    pub feedback: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::feedback)]
pub struct CreateFeedbackEntity {
    pub user_id: String,
    pub user_name: Option<String>,
    #[diesel(column_name = message)]
    pub feedback: String,
    pub rating: i32,
}

// Profiles

#[derive(
    Queryable, Selectable, Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq, ToSchema,
)]
#[diesel(table_name = crate::schema::user_profiles)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntity {
    pub user_id: String,
    pub name: String,
    pub phones: String,
    pub address: String,
    pub bio: String,
    pub emails: Vec<String>,
    pub age: String,
    pub health_issues: Vec<String>,
    pub emergency_contacts: Vec<String>,
    pub profile_picture: String,
}

impl ProfileEntity {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: String::new(),
            phones: String::new(),
            address: String::new(),
            bio: String::new(),
            emails: vec![String::new()],
            age: String::new(),
            health_issues: vec![String::new()],
            emergency_contacts: vec![String::new()],
            profile_picture: String::new(),
        }
    }

    /// List fields always carry at least one (possibly empty) entry.
    pub fn with_list_defaults(mut self) -> Self {
        for list in [
            &mut self.emails,
            &mut self.health_issues,
            &mut self.emergency_contacts,
        ] {
            if list.is_empty() {
                list.push(String::new());
            }
        }
        self
    }
}
