pub mod auth_service;
pub mod cart_service;
pub mod deals;
pub mod order_service;
pub mod product_service;
pub mod token;
