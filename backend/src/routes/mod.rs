//! Route definitions for the management backend API

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - stock ledger
        .nest("/stock", stock_routes())
        // Protected routes - sales
        .nest("/sales", sale_routes())
        // Protected routes - purchases
        .nest("/purchases", purchase_routes())
        // Protected routes - clients
        .nest("/clients", client_routes())
        // Protected routes - providers
        .nest("/providers", provider_routes())
        // Protected routes - taxes
        .nest("/taxes", tax_routes())
        // Protected routes - user directory
        .nest("/users", user_routes())
        // Protected routes - low-stock notifications
        .nest("/notifications", notification_routes())
        // Protected routes - reporting
        .nest("/reports", report_routes())
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/:product_id/providers",
            get(handlers::list_product_providers).post(handlers::link_provider),
        )
        .route(
            "/:product_id/providers/:provider_id",
            delete(handlers::unlink_provider),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock ledger routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/low", get(handlers::list_low_stock))
        .route("/:product_id", get(handlers::get_stock_record))
        .route("/:product_id/movements", get(handlers::get_stock_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sale routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/:order_id",
            get(handlers::get_order).delete(handlers::delete_order),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route(
            "/:order_id",
            get(handlers::get_order).delete(handlers::delete_order),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Client routes (protected)
fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/:client_id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Provider routes (protected)
fn provider_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_providers).post(handlers::create_provider),
        )
        .route(
            "/:provider_id",
            get(handlers::get_provider)
                .put(handlers::update_provider)
                .delete(handlers::delete_provider),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Tax routes (protected)
fn tax_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_taxes).post(handlers::create_tax))
        .route(
            "/:tax_id",
            get(handlers::get_tax)
                .put(handlers::update_tax)
                .delete(handlers::delete_tax),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// User directory routes (protected)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route("/me", get(handlers::get_current_user))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Low-stock notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route(
            "/:notification_id/accept",
            post(handlers::accept_notification),
        )
        .route(
            "/:notification_id/reject",
            post(handlers::reject_notification),
        )
        .route("/sweep", post(handlers::run_sweep))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/sales/summary", get(handlers::sales_summary))
        .route("/purchases/summary", get(handlers::purchases_summary))
        .route("/products/top", get(handlers::top_products))
        .route("/inventory/valuation", get(handlers::inventory_valuation))
        .route("/sales/export", get(handlers::export_sales_csv))
        .route("/purchases/export", get(handlers::export_purchases_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}
