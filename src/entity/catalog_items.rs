use sea_orm::entity::prelude::*;

use crate::store::ActiveScope;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub image_url: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount_percentage: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub is_flash_sale: bool,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub flash_sale_price: Decimal,
    pub flash_sale_end_time: Option<DateTimeWithTimeZone>,
    pub initial_stock: i32,
    pub is_top_deal: bool,
    pub deal_type: String,
    pub deal_priority: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveScope for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn active_column() -> Column {
        Column::IsActive
    }

    fn updated_at_column() -> Column {
        Column::UpdatedAt
    }
}
