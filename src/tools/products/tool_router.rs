use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo};

use super::executor::{failure_response, ProductQueryExecutor};
use super::TOOL_NAME;
use crate::core::schema;
use crate::infra::runtime::mcp_transport::ServerHandler;

#[derive(Clone)]
pub struct ProductsSvc {
    executor: ProductQueryExecutor,
}

impl ProductsSvc {
    pub fn new(executor: ProductQueryExecutor) -> Self {
        Self { executor }
    }
}

impl ServerHandler for ProductsSvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Product catalogue lookup. Call get_products with `q` for free-text search, \
                 or with filters and skip/limit for paginated listing."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[rmcp::tool_router]
impl ProductsSvc {
    #[rmcp::tool(
        name = "get_products",
        description = "Get a list of products with optional filtering and pagination."
    )]
    async fn get_products(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        tracing::debug!(params = ?params.0, "get_products invoked");
        let query = schema::normalize(&params.0)
            .map_err(|e| rmcp::ErrorData::invalid_params(e.to_string(), None))?;

        match self.executor.execute(&query).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                tracing::error!(error = %e, "get_products failed");
                Ok(failure_response(&e))
            }
        }
    }
}

pub type ProductsRouter = ToolRouter<ProductsSvc>;

impl ProductsSvc {
    /// Macro-generated router with the declarative argument schema attached.
    pub fn router() -> ProductsRouter {
        let mut tools = Self::tool_router();
        if let Some(route) = tools.map.get_mut(TOOL_NAME) {
            route.attr.input_schema = Arc::new(schema::input_schema());
        }
        tools
    }
}
