use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::QueryError;

/// Protocol-facing result of a tool invocation.
pub type ToolResponse = rmcp::model::CallToolResult;

/// Where product lists come from. One call per invocation, no retries.
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync + 'static {
    async fn fetch(&self, query: &QueryParams) -> Result<ProductList, QueryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("expected one of asc, desc; got {other:?}")),
        }
    }
}

/// A single validated parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    Order(SortOrder),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Order(o) => f.write_str(o.as_str()),
        }
    }
}

/// Which upstream endpoint a query resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode<'a> {
    Search(&'a str),
    Filter,
}

/// Normalized `get_products` arguments, kept in schema order.
///
/// Built by [`crate::core::schema::normalize`]; absent fields are simply not
/// stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    fields: Vec<(&'static str, ParamValue)>,
}

impl QueryParams {
    pub(crate) fn from_fields(fields: Vec<(&'static str, ParamValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn q(&self) -> Option<&str> {
        match self.get("q") {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn skip(&self) -> Option<f64> {
        self.number("skip")
    }

    pub fn limit(&self) -> Option<f64> {
        self.number("limit")
    }

    fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// A non-empty `q` always wins over every other field.
    pub fn mode(&self) -> QueryMode<'_> {
        match self.q() {
            Some(q) if !q.is_empty() => QueryMode::Search(q),
            _ => QueryMode::Filter,
        }
    }

    /// Every present field except `q`, in schema order.
    pub fn filters(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.fields
            .iter()
            .filter(|(n, _)| *n != "q")
            .map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Upstream list envelope. Everything stays opaque JSON so it is relayed
/// exactly as received; only `products` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductList {
    pub products: Vec<serde_json::Value>,
    #[serde(default)]
    pub total: Option<serde_json::Value>,
    #[serde(default)]
    pub skip: Option<serde_json::Value>,
    #[serde(default)]
    pub limit: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

/// Lenient typed view of an upstream product, used for summaries only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: Option<ProductId>,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u64,
    pub brand: Option<String>,
    pub category: String,
    pub thumbnail: String,
    pub images: Vec<String>,
}
