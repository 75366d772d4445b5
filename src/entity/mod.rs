pub mod basket_items;
pub mod baskets;
pub mod catalog_items;
pub mod order_items;
pub mod orders;
pub mod users;

pub use basket_items::Entity as BasketItems;
pub use baskets::Entity as Baskets;
pub use catalog_items::Entity as CatalogItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
