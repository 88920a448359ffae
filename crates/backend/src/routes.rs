use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D400 PIZZA SALES DASHBOARD
        // ========================================
        .route(
            "/api/d400/filter_options",
            get(handlers::d400_pizza_sales::get_filter_options),
        )
        .route(
            "/api/d400/dashboard",
            post(handlers::d400_pizza_sales::get_dashboard),
        )
        .route("/api/d400/kpis", post(handlers::d400_pizza_sales::get_kpis))
        .route(
            "/api/d400/orders_by",
            post(handlers::d400_pizza_sales::get_orders_by),
        )
        .route(
            "/api/d400/sales_share",
            post(handlers::d400_pizza_sales::get_sales_share),
        )
        .route(
            "/api/d400/top",
            post(handlers::d400_pizza_sales::get_top_sellers),
        )
}
