use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    dto::{
        Validate,
        orders::{
            CancelOrderRequest, CreateOrderRequest, ListOrdersRequest, OrderItemInput,
            UpdateOrderStatusRequest,
        },
    },
    entity::{
        OrderItems, Orders,
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Model as OrderModel},
    },
    error::{ServiceError, ServiceResult},
    models::{Order, OrderItem, OrderStatus},
    state::AppState,
    store::{ORDER_PAGE_SIZE, Page, fetch_page},
};

/// One order line frozen at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSnapshot {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl LineSnapshot {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Copy the caller's lines and compute the order total from them.
pub fn snapshot_items(items: &[OrderItemInput]) -> (Vec<LineSnapshot>, Decimal) {
    let lines: Vec<LineSnapshot> = items
        .iter()
        .map(|item| LineSnapshot {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.price,
        })
        .collect();
    let total = lines.iter().map(LineSnapshot::subtotal).sum();
    (lines, total)
}

/// Delivered and cancelled orders cannot be cancelled. Statuses outside the
/// known set are not terminal.
pub fn ensure_cancellable(status: &str) -> ServiceResult<()> {
    match OrderStatus::parse(status) {
        Some(current) if current.is_terminal() => Err(ServiceError::Rule(format!(
            "cannot cancel order with status: {status}"
        ))),
        _ => Ok(()),
    }
}

pub async fn create_order(state: &AppState, payload: CreateOrderRequest) -> ServiceResult<Order> {
    payload.order.validate()?;
    let (lines, total_price) = snapshot_items(&payload.order.items);

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(payload.user_id),
        status: Set(OrderStatus::Pending.as_str().into()),
        total_price: Set(total_price),
        shipping_address: Set(payload.order.shipping_address),
        payment_method: Set(payload.order.payment_method),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for line in lines {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            product_name: Set(line.product_name),
            quantity: Set(line.quantity),
            price: Set(line.price),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    tracing::info!(order_id = %order.id, user_id = %order.user_id, total = %total_price, "order created");
    get_order(state, order.id).await
}

/// Looked up by id alone; ownership is only enforced on cancellation.
pub async fn get_order(state: &AppState, order_id: Uuid) -> ServiceResult<Order> {
    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| ServiceError::NotFound("order not found".into()))?;
    with_items(&state.orm, order).await
}

pub async fn list_orders(state: &AppState, payload: ListOrdersRequest) -> ServiceResult<Page<Order>> {
    let paging = payload.page.normalize(ORDER_PAGE_SIZE);
    let finder = Orders::find()
        .filter(OrderCol::UserId.eq(payload.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id);
    let page = fetch_page(finder, paging, &state.orm).await?;

    let order_ids: Vec<Uuid> = page.items.iter().map(|order| order.id).collect();
    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if !order_ids.is_empty() {
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(order_ids))
            .order_by_asc(OrderItemCol::CreatedAt)
            .order_by_asc(OrderItemCol::Id)
            .all(&state.orm)
            .await?;
        for item in items {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(order_item_from_entity(item));
        }
    }

    Ok(page.map(|order| {
        let items = items_by_order.remove(&order.id).unwrap_or_default();
        order_from_entity(order, items)
    }))
}

/// Overwrite the status with whatever non-empty value the caller sends.
pub async fn update_status(
    state: &AppState,
    payload: UpdateOrderStatusRequest,
) -> ServiceResult<Order> {
    payload.change.validate()?;
    let status = payload.change.status.trim().to_string();

    let order = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| ServiceError::NotFound("order not found".into()))?;

    let previous = order.status.clone();
    let mut active: OrderActive = order.into();
    active.status = Set(status.clone());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = %order.id, from = %previous, to = %status, "order status changed");
    with_items(&state.orm, order).await
}

pub async fn cancel_order(state: &AppState, payload: CancelOrderRequest) -> ServiceResult<Order> {
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(payload.order_id))
                .add(OrderCol::UserId.eq(payload.user_id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("order not found or unauthorized".into()))?;

    ensure_cancellable(&order.status)?;

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, user_id = %order.user_id, "order cancelled");
    with_items(&state.orm, order).await
}

async fn with_items<C: ConnectionTrait>(db: &C, order: OrderModel) -> ServiceResult<Order> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .order_by_asc(OrderItemCol::Id)
        .all(db)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();
    Ok(order_from_entity(order, items))
}

fn order_from_entity(model: OrderModel, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        items,
        status: model.status,
        total_price: model.total_price,
        shipping_address: model.shipping_address,
        payment_method: model.payment_method,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        subtotal: model.price * Decimal::from(model.quantity),
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        product_name: model.product_name,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::orders::CreateOrderBody;
    use std::str::FromStr;

    fn line(quantity: i32, price: &str) -> OrderItemInput {
        OrderItemInput {
            product_id: Uuid::new_v4(),
            product_name: "item".into(),
            quantity,
            price: Decimal::from_str(price).expect("decimal"),
        }
    }

    #[test]
    fn snapshot_totals_lines_exactly() {
        let (lines, total) = snapshot_items(&[line(2, "299.99"), line(1, "49.99")]);
        assert_eq!(lines.len(), 2);
        assert_eq!(total, Decimal::from_str("649.97").expect("decimal"));
        assert_eq!(lines[0].subtotal(), Decimal::from_str("599.98").expect("decimal"));
    }

    #[test]
    fn sub_cent_prices_are_rejected_before_totalling() {
        let body = CreateOrderBody {
            shipping_address: "12 Marina Rd".into(),
            payment_method: "card".into(),
            items: vec![line(3, "0.005")],
        };
        let err = body.validate().expect_err("three decimal places");
        assert_eq!(err.to_string(), "price must have at most 2 decimal places");

        let body = CreateOrderBody {
            items: vec![line(3, "19.990")],
            ..body
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn terminal_statuses_block_cancellation() {
        let err = ensure_cancellable("delivered").expect_err("delivered is terminal");
        assert_eq!(err.to_string(), "cannot cancel order with status: delivered");
        assert!(ensure_cancellable("cancelled").is_err());
    }

    #[test]
    fn open_statuses_allow_cancellation() {
        for status in ["pending", "processing", "shipped", "on_hold"] {
            assert!(ensure_cancellable(status).is_ok(), "{status}");
        }
    }
}
