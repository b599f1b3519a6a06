use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};

use crate::core::error::QueryError;
use crate::domain::{ProductList, ProductSource, QueryParams, ToolResponse};

/// Runs one normalized query against a [`ProductSource`] and renders the
/// result. Holds no state between calls.
#[derive(Clone)]
pub struct ProductQueryExecutor {
    source: Arc<dyn ProductSource>,
}

impl ProductQueryExecutor {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }

    /// Dispatch only, without rendering.
    pub async fn fetch(&self, query: &QueryParams) -> Result<ProductList, QueryError> {
        self.source.fetch(query).await
    }

    pub async fn execute(&self, query: &QueryParams) -> Result<ToolResponse, QueryError> {
        let list = self.fetch(query).await?;
        render(&list)
    }
}

/// Single text block: a heading plus the pretty-printed products array.
pub fn render(list: &ProductList) -> Result<ToolResponse, QueryError> {
    let pretty = serde_json::to_string_pretty(&list.products)
        .map_err(|e| QueryError::MalformedUpstreamResponse(e.to_string()))?;
    let text = format!("Products Results:\n\n{pretty}");
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Error-flagged response surfaced to the host for a failed invocation.
pub fn failure_response(err: &QueryError) -> ToolResponse {
    CallToolResult::error(vec![Content::text(format!("Failed to fetch products: {err}"))])
}
