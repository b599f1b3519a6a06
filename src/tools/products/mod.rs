//! The `get_products` tool: executor plus its rmcp router.

pub mod executor;
pub mod tool_router;

pub use executor::ProductQueryExecutor;
pub use tool_router::{ProductsRouter, ProductsSvc};

/// Must match the `name` given to `#[rmcp::tool]` on `ProductsSvc::get_products`.
pub const TOOL_NAME: &str = "get_products";

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use serde_json::json;

    use super::{ProductQueryExecutor, ProductsSvc};
    use crate::core::error::QueryError;
    use crate::domain::{ProductList, ProductSource, QueryParams};

    /// Source that returns a canned result without touching the network.
    pub struct StubSource(pub fn() -> Result<ProductList, QueryError>);

    #[async_trait::async_trait]
    impl ProductSource for StubSource {
        async fn fetch(&self, _query: &QueryParams) -> Result<ProductList, QueryError> {
            (self.0)()
        }
    }

    pub fn one_phone() -> Result<ProductList, QueryError> {
        Ok(ProductList {
            products: vec![json!({"id": "1", "title": "Phone"})],
            total: Some(json!(1)),
            skip: Some(json!(0)),
            limit: Some(json!(10)),
        })
    }

    pub fn stub_svc() -> ProductsSvc {
        ProductsSvc::new(ProductQueryExecutor::new(Arc::new(StubSource(one_phone))))
    }
}
