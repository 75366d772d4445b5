use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            LoginRequest, LoginResponse, ProfileChanges, RegisterRequest, RegisterResponse,
            TokenKind, VerifyTokenRequest, VerifyTokenResponse,
        },
        cart::{AddToCartBody, RemoveFromCartBody, UpdateCartItemBody},
        orders::{CreateOrderBody, OrderItemInput, OrderList, UpdateOrderStatusBody},
        products::{CreateProductRequest, ProductChanges, ProductList},
    },
    error::ErrorCode,
    models::{Basket, BasketItem, Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{auth, cart, health, orders, products, users},
    store::PageRequest,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::get_user,
        users::update_user,
        users::delete_user,
        auth::verify,
        products::list_products,
        products::search_products,
        products::products_by_category,
        products::top_deals,
        products::deals_by_type,
        products::flash_sales,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        orders::cancel_order
    ),
    components(
        schemas(
            User,
            Product,
            Basket,
            BasketItem,
            Order,
            OrderItem,
            ErrorCode,
            TokenKind,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            ProfileChanges,
            VerifyTokenRequest,
            VerifyTokenResponse,
            CreateProductRequest,
            ProductChanges,
            ProductList,
            AddToCartBody,
            UpdateCartItemBody,
            RemoveFromCartBody,
            CreateOrderBody,
            OrderItemInput,
            UpdateOrderStatusBody,
            OrderList,
            PageRequest,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Basket>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<User>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Registration, login and profile endpoints"),
        (name = "Auth", description = "Token verification"),
        (name = "Products", description = "Catalog, deals and flash sales"),
        (name = "Cart", description = "Basket endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
