use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

/// Input checks shared by the gateway (before any RPC) and the owning service.
pub trait Validate {
    fn validate(&self) -> ServiceResult<()>;
}

/// Money columns are `NUMERIC(12, 2)`; anything finer would be rounded by
/// Postgres independently per column and break stored totals.
pub(crate) fn check_cents(field: &str, amount: Decimal) -> ServiceResult<()> {
    if amount.normalize().scale() > 2 {
        return Err(ServiceError::Validation(format!(
            "{field} must have at most 2 decimal places"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdRequest {
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::dto::{cart::AddToCartBody, products::ProductChanges};

    fn money(value: &str) -> Decimal {
        Decimal::from_str(value).expect("decimal")
    }

    #[test]
    fn cents_allow_trailing_zeros_only() {
        assert!(check_cents("price", money("10")).is_ok());
        assert!(check_cents("price", money("10.50")).is_ok());
        assert!(check_cents("price", money("10.5000")).is_ok());
        assert!(check_cents("price", money("10.001")).is_err());
    }

    #[test]
    fn basket_and_catalog_prices_need_cents() {
        let item = AddToCartBody {
            product_id: Uuid::new_v4(),
            product_name: "Phone".into(),
            image_url: String::new(),
            quantity: 1,
            price: money("0.005"),
        };
        assert!(item.validate().is_err());

        let changes = ProductChanges {
            flash_sale_price: Some(money("4.999")),
            ..Default::default()
        };
        let err = changes.validate().expect_err("sub-cent flash price");
        assert_eq!(
            err.to_string(),
            "flash_sale_price must have at most 2 decimal places"
        );
    }
}
