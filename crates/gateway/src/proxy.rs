//! Request forwarding to the upstream services.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use futures_util::StreamExt;

use crate::error::GatewayError;
use crate::routing::RouteTable;

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Shared gateway state.
pub struct GatewayState {
    pub routes: RouteTable,
    pub client: reqwest::Client,
    pub max_body_bytes: usize,
}

impl GatewayState {
    /// Creates gateway state with an outbound client bounded by `timeout`.
    ///
    /// The client never follows redirects: they are handed back to the
    /// caller like any other response.
    pub fn new(
        routes: RouteTable,
        timeout: Duration,
        max_body_bytes: usize,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            routes,
            client,
            max_body_bytes,
        })
    }
}

/// Fallback handler: forwards the request to the upstream owning its path.
#[tracing::instrument(skip(state, req), fields(method = %req.method(), path = %req.uri().path()))]
pub async fn forward(
    State(state): State<Arc<GatewayState>>,
    req: Request,
) -> Result<Response, GatewayError> {
    let path = req.uri().path().to_string();
    let route = state
        .routes
        .resolve(&path)
        .ok_or_else(|| GatewayError::NoRoute(path.clone()))?;
    let target = route.target_url(&path, req.uri().query());
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let (parts, body) = req.into_parts();
    let body = read_body(body, state.max_body_bytes).await?;

    metrics::counter!("gateway_requests_total", "upstream" => route.prefix().to_string())
        .increment(1);
    tracing::debug!(%target, "forwarding request");

    let upstream_error = |source| {
        metrics::counter!("gateway_upstream_errors_total").increment(1);
        GatewayError::Upstream {
            upstream: route.upstream().to_string(),
            source,
        }
    };

    let upstream = state
        .client
        .request(parts.method, target)
        .headers(outbound_headers(&parts.headers, client_ip))
        .body(body)
        .send()
        .await
        .map_err(upstream_error)?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);
    let body = upstream.bytes().await.map_err(upstream_error)?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Buffers an inbound body, refusing to hold more than `limit` bytes.
async fn read_body(body: Body, limit: usize) -> Result<Bytes, GatewayError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| GatewayError::Body(e.to_string()))?;
        if buf.len() + chunk.len() > limit {
            return Err(GatewayError::BodyTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buf))
}

/// Removes hop-by-hop headers, including any named in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in listed.iter().map(String::as_str).chain(HOP_BY_HOP) {
        headers.remove(name);
    }
}

/// Headers sent upstream: the inbound set minus hop-by-hop headers, with
/// `Host` left to the client and the `X-Forwarded-*` family filled in.
fn outbound_headers(inbound: &HeaderMap, client_ip: Option<IpAddr>) -> HeaderMap {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    if let Some(ip) = client_ip {
        let forwarded_for = match inbound
            .get(&X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
        {
            Some(prior) => format!("{prior}, {ip}"),
            None => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&forwarded_for) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    if let Some(host) = inbound.get(header::HOST)
        && !headers.contains_key(&X_FORWARDED_HOST)
    {
        headers.insert(X_FORWARDED_HOST, host.clone());
    }

    if !headers.contains_key(&X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    }

    headers
}
