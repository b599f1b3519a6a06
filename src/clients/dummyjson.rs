use std::time::Instant;

use reqwest::Client;
use serde_json::Value as JsonValue;
use url::Url;

use crate::core::error::QueryError;
use crate::domain::{ProductList, ProductSource, QueryMode, QueryParams};
use crate::infra::http::headers::add_standard_headers;

/// Remote product catalogue speaking the dummyjson.com `/products` API.
#[derive(Clone)]
pub struct ProductsRemote {
    search_endpoint: Url,
    list_endpoint: Url,
    http: Client,
}

impl ProductsRemote {
    pub fn new(base: &str, http: Client) -> Result<Self, url::ParseError> {
        let base = base.trim_end_matches('/');
        Ok(Self {
            search_endpoint: Url::parse(&format!("{base}/products/search"))?,
            list_endpoint: Url::parse(&format!("{base}/products"))?,
            http,
        })
    }

    /// Build the outbound URL for a normalized query. Pure.
    ///
    /// Search mode forwards only `q`; filter mode forwards every present
    /// field except `q`.
    pub fn request_url(&self, query: &QueryParams) -> Url {
        match query.mode() {
            QueryMode::Search(q) => {
                let mut url = self.search_endpoint.clone();
                url.query_pairs_mut().append_pair("q", q);
                url
            }
            QueryMode::Filter => {
                let mut url = self.list_endpoint.clone();
                let mut filters = query.filters().peekable();
                if filters.peek().is_some() {
                    let mut pairs = url.query_pairs_mut();
                    for (name, value) in filters {
                        pairs.append_pair(name, &value.to_string());
                    }
                }
                url
            }
        }
    }

    pub async fn fetch_products(&self, query: &QueryParams) -> Result<ProductList, QueryError> {
        let url = self.request_url(query);
        tracing::debug!(endpoint = %url, "products request");

        let start = Instant::now();
        let (builder, rid) = add_standard_headers(self.http.get(url), None);
        let res = async {
            let resp = builder.send().await.map_err(QueryError::UpstreamUnreachable)?;
            let status = resp.status();
            let body = resp.bytes().await.map_err(QueryError::UpstreamUnreachable)?;
            tracing::debug!(request_id = %rid, %status, bytes = body.len(), "products response");
            decode_product_list(&body)
        }
        .await;

        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_millis() as f64;
                crate::infra::logging::log_metric("get_products", "remote_latency_ms", elapsed_ms);
            }
            Err(_) => crate::infra::logging::log_metric("get_products", "remote_error_total", 1.0),
        }
        res
    }
}

#[async_trait::async_trait]
impl ProductSource for ProductsRemote {
    async fn fetch(&self, query: &QueryParams) -> Result<ProductList, QueryError> {
        self.fetch_products(query).await
    }
}

/// Accept any status as long as the body is JSON carrying a `products` array;
/// dummyjson reports errors as `{"message": ...}` bodies.
fn decode_product_list(body: &[u8]) -> Result<ProductList, QueryError> {
    let value: JsonValue = serde_json::from_slice(body)
        .map_err(|e| QueryError::MalformedUpstreamResponse(format!("invalid JSON body: {e}")))?;
    match value.get("products") {
        None | Some(JsonValue::Null) => {
            let detail = value
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| format!(" (upstream said: {m})"))
                .unwrap_or_default();
            return Err(QueryError::MalformedUpstreamResponse(format!(
                "No results returned from API{detail}"
            )));
        }
        Some(_) => {}
    }
    serde_json::from_value(value).map_err(|e| QueryError::MalformedUpstreamResponse(e.to_string()))
}
