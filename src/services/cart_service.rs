//! Basket aggregation.
//!
//! Races between concurrent requests for the same user are settled by the
//! store: `baskets.user_id` and `basket_items (basket_id, product_id)` are
//! unique, and both creation paths are single upsert statements.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, sea_query::Expr};
use uuid::Uuid;

use crate::{
    dto::{
        Validate,
        cart::{AddToCartBody, AddToCartRequest, RemoveFromCartRequest, UpdateCartItemRequest},
    },
    entity::{
        BasketItems, Baskets,
        basket_items::{Column as ItemCol, Model as BasketItemModel},
        baskets::{Column as BasketCol, Model as BasketModel},
    },
    error::{ServiceError, ServiceResult},
    models::{Basket, BasketItem},
    rpc::Empty,
    state::AppState,
};

/// Outcome of [`add_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created(Uuid),
    Merged(Uuid),
}

/// Return the user's basket, creating it on first use. Exactly one row per
/// user ever exists, however many callers race here.
pub async fn get_or_create(state: &AppState, user_id: Uuid) -> ServiceResult<BasketModel> {
    sqlx::query("INSERT INTO baskets (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(&state.pool)
        .await?;

    find_basket(state, user_id)
        .await?
        .ok_or_else(|| ServiceError::Internal(anyhow::anyhow!("basket missing after upsert")))
}

/// Add `item` to the basket or grow the existing line for the same product.
///
/// A merged line keeps its stored name, image and price; only the quantity
/// increases.
pub async fn add_item(
    state: &AppState,
    basket_id: Uuid,
    item: &AddToCartBody,
) -> ServiceResult<AddOutcome> {
    item.validate()?;

    let new_id = Uuid::new_v4();
    let (item_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO basket_items (id, basket_id, product_id, product_name, quantity, price, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (basket_id, product_id) DO UPDATE
        SET quantity = basket_items.quantity + EXCLUDED.quantity,
            updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind(new_id)
    .bind(basket_id)
    .bind(item.product_id)
    .bind(item.product_name.as_str())
    .bind(item.quantity)
    .bind(item.price)
    .bind(item.image_url.as_str())
    .fetch_one(&state.pool)
    .await?;

    touch_basket(state, basket_id).await?;

    if item_id == new_id {
        Ok(AddOutcome::Created(item_id))
    } else {
        tracing::info!(%basket_id, product_id = %item.product_id, quantity = item.quantity, "basket line merged");
        Ok(AddOutcome::Merged(item_id))
    }
}

/// Set the quantity of an existing line to an absolute value.
pub async fn update_item(
    state: &AppState,
    basket_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> ServiceResult<()> {
    if quantity < 1 {
        return Err(ServiceError::Validation(
            "quantity must be greater than 0".into(),
        ));
    }

    let result = BasketItems::update_many()
        .col_expr(ItemCol::Quantity, Expr::value(quantity))
        .col_expr(ItemCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(ItemCol::BasketId.eq(basket_id))
        .filter(ItemCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound("item not found in basket".into()));
    }
    touch_basket(state, basket_id).await
}

/// Removing a product that is not in the basket is a no-op.
pub async fn remove_item(state: &AppState, basket_id: Uuid, product_id: Uuid) -> ServiceResult<()> {
    let result = BasketItems::delete_many()
        .filter(ItemCol::BasketId.eq(basket_id))
        .filter(ItemCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        touch_basket(state, basket_id).await?;
    }
    Ok(())
}

/// Empty the user's basket. Succeeds when the user has none yet.
pub async fn clear(state: &AppState, user_id: Uuid) -> ServiceResult<Empty> {
    let Some(basket) = find_basket(state, user_id).await? else {
        return Ok(Empty {});
    };

    let result = BasketItems::delete_many()
        .filter(ItemCol::BasketId.eq(basket.id))
        .exec(&state.orm)
        .await?;
    touch_basket(state, basket.id).await?;

    tracing::info!(%user_id, removed = result.rows_affected, "basket cleared");
    Ok(Empty {})
}

/// The user's basket with freshly computed totals. A user without a basket
/// gets an empty, unsaved one.
pub async fn get_basket(state: &AppState, user_id: Uuid) -> ServiceResult<Basket> {
    match find_basket(state, user_id).await? {
        Some(basket) => load_basket(state, basket).await,
        None => Ok(Basket::empty(user_id)),
    }
}

pub async fn add_to_basket(state: &AppState, payload: AddToCartRequest) -> ServiceResult<Basket> {
    payload.item.validate()?;
    let basket = get_or_create(state, payload.user_id).await?;
    add_item(state, basket.id, &payload.item).await?;
    load_basket(state, basket).await
}

pub async fn update_basket_item(
    state: &AppState,
    payload: UpdateCartItemRequest,
) -> ServiceResult<Basket> {
    payload.item.validate()?;
    let basket = get_or_create(state, payload.user_id).await?;
    update_item(state, basket.id, payload.item.product_id, payload.item.quantity).await?;
    load_basket(state, basket).await
}

pub async fn remove_from_basket(
    state: &AppState,
    payload: RemoveFromCartRequest,
) -> ServiceResult<Basket> {
    let basket = get_or_create(state, payload.user_id).await?;
    remove_item(state, basket.id, payload.product_id).await?;
    load_basket(state, basket).await
}

async fn find_basket(state: &AppState, user_id: Uuid) -> ServiceResult<Option<BasketModel>> {
    Ok(Baskets::find()
        .filter(BasketCol::UserId.eq(user_id))
        .one(&state.orm)
        .await?)
}

async fn load_basket(state: &AppState, basket: BasketModel) -> ServiceResult<Basket> {
    let items = BasketItems::find()
        .filter(ItemCol::BasketId.eq(basket.id))
        .order_by_asc(ItemCol::CreatedAt)
        .order_by_asc(ItemCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(basket_item_from_entity)
        .collect();

    // re-read so updated_at reflects the last item change
    let basket = Baskets::find_by_id(basket.id)
        .one(&state.orm)
        .await?
        .unwrap_or(basket);

    Ok(Basket::with_items(
        basket.id,
        basket.user_id,
        items,
        basket.created_at.with_timezone(&Utc),
        basket.updated_at.with_timezone(&Utc),
    ))
}

async fn touch_basket(state: &AppState, basket_id: Uuid) -> ServiceResult<()> {
    Baskets::update_many()
        .col_expr(BasketCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(BasketCol::Id.eq(basket_id))
        .exec(&state.orm)
        .await?;
    Ok(())
}

fn basket_item_from_entity(model: BasketItemModel) -> BasketItem {
    BasketItem {
        subtotal: model.price * Decimal::from(model.quantity),
        id: model.id,
        basket_id: model.basket_id,
        product_id: model.product_id,
        product_name: model.product_name,
        quantity: model.quantity,
        price: model.price,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
