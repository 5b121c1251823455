//! Route definitions for the Stock Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers,
    middleware::{admin_middleware, auth_middleware},
    AppState,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (register/login public, me protected)
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/dashboard", dashboard_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/movements", movement_routes())
        .nest("/inventories", inventory_routes())
        .nest("/alerts", alert_routes())
        // Admin-only routes
        .nest("/users", user_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/can-register", get(handlers::can_register))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::dashboard_stats))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product routes (protected)
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
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Movement routes (protected)
fn movement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_movements).post(handlers::create_movement),
        )
        .route("/summary", get(handlers::movement_summary))
        .route("/product/:product_id", get(handlers::movements_by_product))
        .route(
            "/:movement_id",
            get(handlers::get_movement).delete(handlers::delete_movement),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_inventories).post(handlers::create_inventory),
        )
        .route(
            "/:inventory_id",
            get(handlers::get_inventory).delete(handlers::delete_inventory),
        )
        .route("/:inventory_id/complete", post(handlers::complete_inventory))
        .route("/:inventory_id/items", post(handlers::add_inventory_item))
        .route(
            "/:inventory_id/items/:item_id",
            put(handlers::update_inventory_item).delete(handlers::remove_inventory_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Alert routes (protected)
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// User management routes (admin only)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
}
