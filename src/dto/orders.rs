use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{Validate, check_cents},
    error::{ServiceError, ServiceResult},
    store::PageRequest,
};

/// One order line as the caller priced it; frozen into the order on creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    #[serde(default)]
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderBody {
    pub shipping_address: String,
    pub payment_method: String,
    pub items: Vec<OrderItemInput>,
}

impl Validate for CreateOrderBody {
    fn validate(&self) -> ServiceResult<()> {
        if self.items.is_empty() {
            return Err(ServiceError::Validation(
                "an order needs at least one item".into(),
            ));
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Err(ServiceError::Validation(format!(
                    "quantity for product {} must be greater than 0",
                    item.product_id
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(ServiceError::Validation(format!(
                    "price for product {} must not be negative",
                    item.product_id
                )));
            }
            check_cents("price", item.price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub order: CreateOrderBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdersRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIdRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusBody {
    pub status: String,
}

impl Validate for UpdateOrderStatusBody {
    fn validate(&self) -> ServiceResult<()> {
        if self.status.trim().is_empty() {
            return Err(ServiceError::Validation("status is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub order_id: Uuid,
    #[serde(flatten)]
    pub change: UpdateOrderStatusBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub order_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<crate::models::Order>,
}
