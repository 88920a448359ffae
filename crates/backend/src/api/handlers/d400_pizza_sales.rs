use axum::{http::StatusCode, Json};
use contracts::dashboards::d400_pizza_sales::{
    CalendarRequest, DashboardRequest, FilterOptions, GroupedSummary, KpiResponse,
    PizzaSalesDashboard, RankedRow, SalesFilter, ShareRequest, TopRequest,
};

use crate::dashboards::d400_pizza_sales::filter;
use crate::dashboards::d400_pizza_sales::service::{self, DashboardError};
use crate::shared::config::configured_top_n;
use crate::shared::data::order_store::get_table;

/// Map service errors to HTTP status codes and log them
fn error_status(context: &str, err: DashboardError) -> StatusCode {
    match err {
        DashboardError::Filter(e) => {
            tracing::warn!("D400 Dashboard: {}: bad filter: {}", context, e);
            StatusCode::BAD_REQUEST
        }
        DashboardError::Engine(e) => {
            tracing::error!("D400 Dashboard: {}: {}", context, e);
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

/// GET /api/d400/filter_options
pub async fn get_filter_options() -> Json<FilterOptions> {
    let table = get_table();
    Json(filter::filter_options(&table))
}

/// POST /api/d400/dashboard
pub async fn get_dashboard(
    Json(request): Json<DashboardRequest>,
) -> Result<Json<PizzaSalesDashboard>, StatusCode> {
    let table = get_table();
    tracing::info!(
        "D400 Dashboard: Building dashboard over {} rows (filtered: {})",
        table.len(),
        !request.filter.is_empty()
    );

    match service::build_dashboard(&table, &request, configured_top_n()) {
        Ok(dashboard) => {
            tracing::info!(
                "D400 Dashboard: Returning dashboard for {} rows in scope",
                dashboard.rows_in_scope
            );
            Ok(Json(dashboard))
        }
        Err(e) => Err(error_status("dashboard", e)),
    }
}

/// POST /api/d400/kpis
pub async fn get_kpis(Json(filter): Json<SalesFilter>) -> Result<Json<KpiResponse>, StatusCode> {
    service::get_kpis(&get_table(), &filter)
        .map(Json)
        .map_err(|e| error_status("kpis", e))
}

/// POST /api/d400/orders_by
pub async fn get_orders_by(
    Json(request): Json<CalendarRequest>,
) -> Result<Json<GroupedSummary>, StatusCode> {
    service::get_orders_by(&get_table(), &request)
        .map(Json)
        .map_err(|e| error_status("orders_by", e))
}

/// POST /api/d400/sales_share
pub async fn get_sales_share(
    Json(request): Json<ShareRequest>,
) -> Result<Json<GroupedSummary>, StatusCode> {
    service::get_sales_share(&get_table(), &request)
        .map(Json)
        .map_err(|e| error_status("sales_share", e))
}

/// POST /api/d400/top
pub async fn get_top_sellers(
    Json(request): Json<TopRequest>,
) -> Result<Json<Vec<RankedRow>>, StatusCode> {
    service::get_top_sellers(&get_table(), &request)
        .map(Json)
        .map_err(|e| error_status("top", e))
}
