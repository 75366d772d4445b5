use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{Validate, check_cents},
    error::{ServiceError, ServiceResult},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddToCartBody {
    pub product_id: Uuid,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub image_url: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl Validate for AddToCartBody {
    fn validate(&self) -> ServiceResult<()> {
        check_quantity(self.quantity)?;
        if self.price < Decimal::ZERO {
            return Err(ServiceError::Validation("price must not be negative".into()));
        }
        check_cents("price", self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub item: AddToCartBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartItemBody {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl Validate for UpdateCartItemBody {
    fn validate(&self) -> ServiceResult<()> {
        check_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub item: UpdateCartItemBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemoveFromCartBody {
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveFromCartRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
}

fn check_quantity(quantity: i32) -> ServiceResult<()> {
    if quantity < 1 {
        return Err(ServiceError::Validation(
            "quantity must be greater than 0".into(),
        ));
    }
    Ok(())
}
