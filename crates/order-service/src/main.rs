//! Order service entry point.

use metrics_exporter_prometheus::PrometheusHandle;
use order_service::config::Config;
use ordering::{HttpCatalogClient, InMemoryProductCache};
use reqwest::Url;
use store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};

async fn serve<O: OrderStore + 'static>(
    config: &Config,
    catalog: HttpCatalogClient,
    orders: O,
    metrics_handle: PrometheusHandle,
) {
    // The cache lives for the whole process and starts empty.
    let cache = InMemoryProductCache::new();
    let state = order_service::create_state(catalog, cache, orders, &config.store);
    let app = order_service::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting order service");

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

    // 2. Client for the product service
    let product_service_url =
        Url::parse(&config.product_service_url).expect("invalid PRODUCT_SERVICE_URL");
    let catalog = HttpCatalogClient::new(&product_service_url, config.upstream_timeout)
        .expect("failed to build HTTP client");
    tracing::info!(url = %catalog.products_url(), "fetching catalog from product service");

    // 3. Open the order store and serve
    match &config.store.database_url {
        Some(url) => {
            let pool = store::connect(url, &config.store.pool_settings())
                .await
                .expect("failed to connect to database");
            let orders = PostgresOrderStore::new(pool);
            orders
                .ensure_schema()
                .await
                .expect("failed to prepare orders table");
            serve(&config, catalog, orders, metrics_handle).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, keeping orders in memory");
            serve(&config, catalog, InMemoryOrderStore::new(), metrics_handle).await;
        }
    }
}
