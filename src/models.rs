use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Public profile. The password hash never leaves the identity service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog item with its deal fields evaluated at read time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub image_url: String,
    pub price: Decimal,
    pub discount_percentage: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub is_flash_sale: bool,
    pub flash_sale_price: Decimal,
    pub flash_sale_end_time: Option<DateTime<Utc>>,
    pub initial_stock: i32,
    pub is_top_deal: bool,
    pub deal_type: String,
    pub deal_priority: i32,
    pub final_price: Decimal,
    pub in_stock: bool,
    pub flash_sale_progress: i32,
    pub flash_sale_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BasketItem {
    pub id: Uuid,
    pub basket_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub image_url: String,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's basket. `id` is `None` until the first item is added.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Basket {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub items: Vec<BasketItem>,
    pub total_price: Decimal,
    pub total_items: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Basket {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            id: None,
            user_id,
            items: Vec::new(),
            total_price: Decimal::ZERO,
            total_items: 0,
            created_at: None,
            updated_at: None,
        }
    }

    /// Totals are always derived from `items`; they are never stored.
    pub fn with_items(
        id: Uuid,
        user_id: Uuid,
        items: Vec<BasketItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let total_price = items.iter().map(|item| item.subtotal).sum();
        let total_items = items.iter().map(|item| i64::from(item.quantity)).sum();
        Self {
            id: Some(id),
            user_id,
            items,
            total_price,
            total_items,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub status: String,
    pub total_price: Decimal,
    pub shipping_address: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

/// The statuses the order service itself assigns or checks.
///
/// The stored column is free text: status updates from outside are written as
/// given, so a stored value may fall outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// `delivered` and `cancelled` can no longer be cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
