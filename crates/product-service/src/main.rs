//! Product service entry point.

use metrics_exporter_prometheus::PrometheusHandle;
use product_service::config::Config;
use store::{InMemoryProductStore, PostgresProductStore, ProductStore};

async fn serve<S: ProductStore + 'static>(
    config: &Config,
    store: S,
    metrics_handle: PrometheusHandle,
) {
    let state = product_service::create_state(store, &config.store);
    let app = product_service::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting product service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(common::telemetry::shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing and metrics
    common::telemetry::init_tracing(&config.log_level);
    let metrics_handle = common::observability::prometheus_handle();

    // 2. Open the catalog store and serve
    match &config.store.database_url {
        Some(url) => {
            let pool = store::connect(url, &config.store.pool_settings())
                .await
                .expect("failed to connect to database");
            let store = PostgresProductStore::new(pool);
            store
                .ensure_schema()
                .await
                .expect("failed to prepare products table");
            serve(&config, store, metrics_handle).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving an in-memory catalog");
            serve(&config, InMemoryProductStore::seeded(), metrics_handle).await;
        }
    }
}
