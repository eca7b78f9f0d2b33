//! Prefix-based route table.

use reqwest::Url;

use crate::error::GatewayError;

/// A path prefix and the upstream base URL it dispatches to.
#[derive(Debug, Clone)]
pub struct Route {
    prefix: String,
    upstream: Url,
}

impl Route {
    /// Creates a route from a prefix and an upstream base URL.
    pub fn new(prefix: impl Into<String>, upstream: &str) -> Result<Self, GatewayError> {
        let upstream = Url::parse(upstream).map_err(|e| GatewayError::InvalidUpstream {
            url: upstream.to_string(),
            reason: e.to_string(),
        })?;
        if upstream.cannot_be_a_base() {
            return Err(GatewayError::InvalidUpstream {
                url: upstream.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        Ok(Self {
            prefix: prefix.into(),
            upstream,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// True when `path` starts with the prefix. Matching is purely textual:
    /// `/products` also claims `/productsale`.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(self.prefix.as_str())
    }

    /// Builds the upstream URL for an inbound path and query.
    ///
    /// The inbound path is appended to the upstream's own path, unmodified.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.upstream.clone();
        let base = self.upstream.path().trim_end_matches('/');
        url.set_path(&format!("{base}{path}"));
        url.set_query(query);
        url
    }
}

/// Fixed set of routes, resolved by longest matching prefix.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The standard table: `/products` and `/orders`.
    pub fn for_services(
        product_service: &str,
        order_service: &str,
    ) -> Result<Self, GatewayError> {
        Ok(Self::new(vec![
            Route::new("/products", product_service)?,
            Route::new("/orders", order_service)?,
        ]))
    }

    /// Returns the route with the longest prefix matching `path`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|route| route.matches(path))
            .max_by_key(|route| route.prefix.len())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
