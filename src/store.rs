//! Paging and soft-delete helpers shared by every domain service.
//!
//! Each service only describes *which* rows it wants (a SeaORM `Select`);
//! counting, slicing and the active-row filter live here.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Select, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const MAX_PAGE_SIZE: u64 = 100;
pub const ORDER_PAGE_SIZE: u64 = 10;
pub const CATALOG_PAGE_SIZE: u64 = 20;

/// Raw paging input as supplied by a caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page, 1..=100
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// `page < 1` becomes 1; a size outside `1..=100` falls back to `default_size`
    /// rather than being clamped to the nearest bound.
    pub fn normalize(&self, default_size: u64) -> Paging {
        let page = self.page.unwrap_or(1).max(1) as u64;
        let page_size = match self.page_size {
            Some(size) if (1..=MAX_PAGE_SIZE as i64).contains(&size) => size as u64,
            _ => default_size,
        };
        Paging { page, page_size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u64,
    pub page_size: u64,
}

impl Paging {
    /// Capped at `i64::MAX`, the largest OFFSET Postgres accepts.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }
}

/// One slice of a listing plus the total number of matching rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Count `finder`'s matches, then fetch the requested slice of it.
pub async fn fetch_page<E, C>(
    finder: Select<E>,
    paging: Paging,
    db: &C,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    C: ConnectionTrait,
{
    let total = finder.clone().count(db).await?;

    let items = finder
        .limit(paging.page_size)
        .offset(paging.offset())
        .all(db)
        .await?;

    Ok(Page {
        items,
        total,
        page: paging.page,
        page_size: paging.page_size,
    })
}

/// Entities that are soft-deleted by clearing an active flag.
pub trait ActiveScope: EntityTrait {
    fn id_column() -> Self::Column;
    fn active_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;

    fn find_active() -> Select<Self> {
        Self::find().filter(Self::active_column().eq(true))
    }

    fn find_active_by_id(id: Uuid) -> Select<Self> {
        Self::find_active().filter(Self::id_column().eq(id))
    }
}

/// Flip the active flag off. Returns `false` when no active row matched.
pub async fn deactivate<E, C>(id: Uuid, db: &C) -> Result<bool, DbErr>
where
    E: ActiveScope,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::active_column(), Expr::value(false))
        .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::active_column().eq(true))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}
