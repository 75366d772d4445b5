//! Deal arithmetic over a catalog item. Everything here is pure; `now` is
//! always passed in so expiry is decided at read time by the caller.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{entity::catalog_items, models::Product};

/// Price after the percentage discount, rounded to cents.
pub fn final_price(price: Decimal, discount_percentage: Decimal) -> Decimal {
    if discount_percentage <= Decimal::ZERO {
        return price;
    }
    let discounted = price * (Decimal::ONE_HUNDRED - discount_percentage) / Decimal::ONE_HUNDRED;
    discounted.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn in_stock(stock: i32, is_active: bool) -> bool {
    stock > 0 && is_active
}

/// Percentage of the initial flash-sale stock already sold, in `0..=100`.
pub fn flash_sale_progress(initial_stock: i32, stock: i32) -> i32 {
    if initial_stock <= 0 {
        return 0;
    }
    let initial = i64::from(initial_stock);
    let sold = initial - i64::from(stock);
    if sold <= 0 {
        return 0;
    }
    // round(100 * sold / initial), half up
    let progress = (200 * sold + initial) / (2 * initial);
    progress.min(100) as i32
}

/// The end time must lie strictly after `now`.
pub fn flash_sale_active(
    is_flash_sale: bool,
    end_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    is_flash_sale && end_time.is_some_and(|end| end > now)
}

/// Build the outward view of a stored item with its derived fields.
pub fn evaluate(model: catalog_items::Model, now: DateTime<Utc>) -> Product {
    let flash_sale_end_time = model.flash_sale_end_time.map(|dt| dt.with_timezone(&Utc));
    Product {
        final_price: final_price(model.price, model.discount_percentage),
        in_stock: in_stock(model.stock, model.is_active),
        flash_sale_progress: flash_sale_progress(model.initial_stock, model.stock),
        flash_sale_active: flash_sale_active(model.is_flash_sale, flash_sale_end_time, now),
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        brand: model.brand,
        image_url: model.image_url,
        price: model.price,
        discount_percentage: model.discount_percentage,
        stock: model.stock,
        is_active: model.is_active,
        is_flash_sale: model.is_flash_sale,
        flash_sale_price: model.flash_sale_price,
        flash_sale_end_time,
        initial_stock: model.initial_stock,
        is_top_deal: model.is_top_deal,
        deal_type: model.deal_type,
        deal_priority: model.deal_priority,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
