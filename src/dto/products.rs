use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{Validate, check_cents},
    error::{ServiceError, ServiceResult},
    store::PageRequest,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub is_flash_sale: bool,
    #[serde(default)]
    pub flash_sale_price: Decimal,
    pub flash_sale_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub initial_stock: i32,
    #[serde(default)]
    pub is_top_deal: bool,
    #[serde(default)]
    pub deal_type: String,
    #[serde(default)]
    pub deal_priority: i32,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::Validation("name is required".into()));
        }
        check_price(self.price)?;
        check_discount(self.discount_percentage)?;
        check_non_negative("stock", self.stock)?;
        check_non_negative("initial_stock", self.initial_stock)?;
        check_flash_sale_price(self.flash_sale_price)
    }
}

/// Partial catalog update; every present field overwrites the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_flash_sale: Option<bool>,
    pub flash_sale_price: Option<Decimal>,
    pub flash_sale_end_time: Option<DateTime<Utc>>,
    pub initial_stock: Option<i32>,
    pub is_top_deal: Option<bool>,
    pub deal_type: Option<String>,
    pub deal_priority: Option<i32>,
}

impl Validate for ProductChanges {
    fn validate(&self) -> ServiceResult<()> {
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(discount) = self.discount_percentage {
            check_discount(discount)?;
        }
        if let Some(stock) = self.stock {
            check_non_negative("stock", stock)?;
        }
        if let Some(initial_stock) = self.initial_stock {
            check_non_negative("initial_stock", initial_stock)?;
        }
        if let Some(flash_sale_price) = self.flash_sale_price {
            check_flash_sale_price(flash_sale_price)?;
        }
        Ok(())
    }
}

fn check_price(price: Decimal) -> ServiceResult<()> {
    if price <= Decimal::ZERO {
        return Err(ServiceError::Validation("price must be greater than 0".into()));
    }
    check_cents("price", price)
}

fn check_flash_sale_price(price: Decimal) -> ServiceResult<()> {
    if price < Decimal::ZERO {
        return Err(ServiceError::Validation(
            "flash_sale_price must not be negative".into(),
        ));
    }
    check_cents("flash_sale_price", price)
}

fn check_discount(discount: Decimal) -> ServiceResult<()> {
    if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
        return Err(ServiceError::Validation(
            "discount_percentage must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: i32) -> ServiceResult<()> {
    if value < 0 {
        return Err(ServiceError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub changes: ProductChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProductsRequest {
    pub query: String,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub category: String,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealTypeRequest {
    pub deal_type: String,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<crate::models::Product>,
}
