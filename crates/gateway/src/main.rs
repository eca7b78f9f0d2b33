//! Gateway entry point.

use std::net::SocketAddr;

use gateway::config::Config;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing and metrics
    common::telemetry::init_tracing(&config.log_level);
    let metrics_handle = common::observability::prometheus_handle();

    // 2. Build the route table
    let state = gateway::create_state(&config).expect("invalid gateway configuration");
    for route in state.routes.routes() {
        tracing::info!(prefix = route.prefix(), upstream = %route.upstream(), "route registered");
    }

    // 3. Start server
    let app = gateway::create_app(state, metrics_handle);
    let addr = config.addr();
    tracing::info!(%addr, "starting API gateway");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(common::telemetry::shutdown_signal())
    .await
    .expect("server error");

    tracing::info!("server shut down gracefully");
}
