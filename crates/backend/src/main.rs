pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod system;

use crate::dashboards::d400_pizza_sales::{engine, service};
use crate::shared::{config, data::order_store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let app_config = config::load_config()?;
    let csv_path = config::get_csv_path(&app_config);
    let server = app_config.server.clone();
    config::install(app_config);

    // The loader fails fast on a missing file or an invalid row
    let rows = order_store::initialize_store(&csv_path)
        .map_err(|e| anyhow::anyhow!("sales data load failed: {e}"))?;
    if rows == 0 {
        tracing::warn!("Sales table {} is empty", csv_path.display());
    }

    service::log_kpi_summary(&engine::compute_kpis(&order_store::get_table()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes()
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server address {}:{}: {e}", server.host, server.port))?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
