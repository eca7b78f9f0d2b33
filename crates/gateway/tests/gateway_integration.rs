//! Integration tests for the gateway against live upstream servers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use gateway::proxy::GatewayState;
use gateway::routing::{Route, RouteTable};
use ordering::{HttpCatalogClient, InMemoryProductCache};
use reqwest::Url;
use serde_json::{Value, json};
use store::{InMemoryOrderStore, InMemoryProductStore, StoreConfig};
use tower::ServiceExt;

const MAX_BODY: usize = 1024;

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// A URL nothing is listening on.
async fn dead_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    drop(listener);
    url
}

/// Upstream that describes the request it received.
async fn echo(req: Request<Body>) -> Json<Value> {
    let (parts, body) = req.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "body": String::from_utf8_lossy(&body),
        "x_forwarded_for": header("x-forwarded-for"),
        "x_forwarded_host": header("x-forwarded-host"),
        "x_forwarded_proto": header("x-forwarded-proto"),
        "connection_token": header("x-connection-scoped"),
    }))
}

fn orders_upstream() -> Router {
    Router::new()
        .route(
            "/orders",
            post(|| async {
                let mut headers = HeaderMap::new();
                headers.insert("x-upstream", "orders".parse().unwrap());
                (StatusCode::IM_A_TEAPOT, headers, "short and stout").into_response()
            }),
        )
        .route("/orders/moved", get(|| async { Redirect::temporary("/elsewhere") }))
}

fn gateway_app(routes: Vec<Route>, timeout: Duration) -> Router {
    let state = GatewayState::new(RouteTable::new(routes), timeout, MAX_BODY).unwrap();
    gateway::create_app(Arc::new(state), common::observability::prometheus_handle())
}

async fn standard_gateway() -> Router {
    let products = serve(Router::new().fallback(echo)).await;
    let orders = serve(orders_upstream()).await;
    gateway_app(
        vec![
            Route::new("/products", products.as_str()).unwrap(),
            Route::new("/orders", orders.as_str()).unwrap(),
        ],
        Duration::from_secs(5),
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_forwards_method_path_query_and_body() {
    let app = standard_gateway().await;

    let (status, _, body) = send(
        &app,
        Request::builder()
            .method("PUT")
            .uri("/products/7?colour=red")
            .body(Body::from("payload"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let echoed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(echoed["method"], "PUT");
    assert_eq!(echoed["path"], "/products/7");
    assert_eq!(echoed["query"], "colour=red");
    assert_eq!(echoed["body"], "payload");
}

#[tokio::test]
async fn test_relays_status_headers_and_body_verbatim() {
    let app = standard_gateway().await;

    let (status, headers, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/orders")
            .body(Body::from(r#"{"product_id": 1}"#))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(headers["x-upstream"], "orders");
    assert_eq!(body, "short and stout");
}

#[tokio::test]
async fn test_redirects_are_returned_not_followed() {
    let app = standard_gateway().await;

    let (status, headers, _) = send(&app, get_request("/orders/moved")).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers["location"], "/elsewhere");
}

#[tokio::test]
async fn test_health_is_answered_locally() {
    // Both upstreams are dead: health must not depend on them.
    let app = gateway_app(
        vec![
            Route::new("/products", dead_url().await.as_str()).unwrap(),
            Route::new("/orders", dead_url().await.as_str()).unwrap(),
        ],
        Duration::from_millis(500),
    );

    let (status, _, body) = send(&app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "API Gateway is healthy");
}

#[tokio::test]
async fn test_health_answers_any_method() {
    let app = standard_gateway().await;

    for method in ["POST", "PUT", "DELETE"] {
        let (status, _, body) = send(
            &app,
            Request::builder()
                .method(method)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "method {method}");
        assert_eq!(body, "API Gateway is healthy");
    }
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let app = standard_gateway().await;

    for path in ["/", "/product", "/api/orders"] {
        let (status, _, body) = send(&app, get_request(path)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
        assert_eq!(body, "404 page not found");
    }
}

#[tokio::test]
async fn test_prefix_claims_any_path_starting_with_it() {
    let app = standard_gateway().await;

    let (status, _, body) = send(&app, get_request("/productsale?id=3")).await;

    assert_eq!(status, StatusCode::OK);
    let echoed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(echoed["path"], "/productsale");
    assert_eq!(echoed["query"], "id=3");
}

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    let app = gateway_app(
        vec![Route::new("/products", dead_url().await.as_str()).unwrap()],
        Duration::from_millis(500),
    );

    let (status, _, _) = send(&app, get_request("/products")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let app = standard_gateway().await;

    let (status, _, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/products")
            .body(Body::from(vec![b'x'; MAX_BODY + 1]))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_interrupted_body_is_400() {
    let app = standard_gateway().await;
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"{\"product_id\"")),
        Err(std::io::Error::other("client disconnected")),
    ];

    let (status, _, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/orders")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sets_forwarded_headers_and_drops_hop_by_hop() {
    let app = standard_gateway().await;
    let client: SocketAddr = "198.51.100.4:50000".parse().unwrap();

    let (status, _, body) = send(
        &app,
        Request::builder()
            .uri("/products")
            .header("host", "shop.example")
            .header("connection", "x-connection-scoped")
            .header("x-connection-scoped", "secret")
            .extension(ConnectInfo(client))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let echoed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(echoed["x_forwarded_for"], "198.51.100.4");
    assert_eq!(echoed["x_forwarded_host"], "shop.example");
    assert_eq!(echoed["x_forwarded_proto"], "http");
    assert_eq!(echoed["connection_token"], Value::Null);
}

#[tokio::test]
async fn test_end_to_end_through_all_services() {
    let products = InMemoryProductStore::seeded();
    let product_base = serve(product_service::create_app(
        product_service::create_state(products, &StoreConfig::default()),
        common::observability::prometheus_handle(),
    ))
    .await;

    let orders = InMemoryOrderStore::new();
    let order_base = serve(order_service::create_app(
        order_service::create_state(
            HttpCatalogClient::new(&product_base, Duration::from_secs(2)).unwrap(),
            InMemoryProductCache::new(),
            orders.clone(),
            &StoreConfig::default(),
        ),
        common::observability::prometheus_handle(),
    ))
    .await;

    let app = gateway_app(
        vec![
            Route::new("/products", product_base.as_str()).unwrap(),
            Route::new("/orders", order_base.as_str()).unwrap(),
        ],
        Duration::from_secs(5),
    );

    let (status, _, body) = send(&app, get_request("/products")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "Laptop");

    let (status, _, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/orders")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"product_id": 2}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Order placed for Phone (ID: 1)!");

    let (status, _, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/orders")
            .body(Body::from(r#"{"product_id": "x"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid order");

    assert_eq!(orders.order_count().await, 1);
}
