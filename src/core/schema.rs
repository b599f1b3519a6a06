//! Declarative argument schema for `get_products`.
//!
//! One table drives both validation ([`normalize`]) and the JSON Schema
//! advertised to MCP hosts ([`input_schema`]).

use rmcp::model::JsonObject;
use serde_json::{json, Value as JsonValue};

use crate::core::error::ValidationError;
use crate::domain::{ParamValue, QueryParams, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Order,
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Order => "string",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Only numeric fields carry defaults.
    pub default: Option<f64>,
    pub description: &'static str,
}

const fn field(name: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec { name, kind, default: None, description }
}

pub const DEFAULT_SKIP: f64 = 0.0;
pub const DEFAULT_LIMIT: f64 = 10.0;

pub const PRODUCT_FIELDS: &[FieldSpec] = &[
    field("id", FieldKind::String, "Filter products by ID"),
    field("q", FieldKind::String, "Filter products by title"),
    field("category", FieldKind::String, "Filter products by category"),
    field("brand", FieldKind::String, "Filter products by brand"),
    field("price", FieldKind::Number, "Filter products by price"),
    field("rating", FieldKind::Number, "Filter products by rating"),
    FieldSpec {
        name: "skip",
        kind: FieldKind::Number,
        default: Some(DEFAULT_SKIP),
        description: "Number of products to skip",
    },
    FieldSpec {
        name: "limit",
        kind: FieldKind::Number,
        default: Some(DEFAULT_LIMIT),
        description: "Maximum number of products to return",
    },
    field("select", FieldKind::String, "Comma-separated list of fields to return"),
    field("sortBy", FieldKind::String, "Field to sort products by"),
    field("order", FieldKind::Order, "Sort order: asc or desc"),
];

/// Validate raw tool arguments and apply defaults.
///
/// `null` counts as absent; unknown keys are ignored.
pub fn normalize(args: &JsonObject) -> Result<QueryParams, ValidationError> {
    for key in args.keys() {
        if !PRODUCT_FIELDS.iter().any(|f| f.name == key) {
            tracing::debug!(field = %key, "ignoring unknown get_products argument");
        }
    }

    let mut fields = Vec::with_capacity(PRODUCT_FIELDS.len());
    for spec in PRODUCT_FIELDS {
        match args.get(spec.name) {
            None | Some(JsonValue::Null) => {
                if let Some(d) = spec.default {
                    fields.push((spec.name, ParamValue::Number(d)));
                }
            }
            Some(raw) => fields.push((spec.name, coerce(spec, raw)?)),
        }
    }
    Ok(QueryParams::from_fields(fields))
}

fn coerce(spec: &FieldSpec, raw: &JsonValue) -> Result<ParamValue, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field: spec.name,
        expected: spec.kind.expected(),
    };
    match spec.kind {
        FieldKind::String => raw
            .as_str()
            .map(|s| ParamValue::Text(s.to_owned()))
            .ok_or_else(wrong_type),
        FieldKind::Number => raw.as_f64().map(ParamValue::Number).ok_or_else(wrong_type),
        FieldKind::Order => {
            let s = raw.as_str().ok_or_else(wrong_type)?;
            s.parse::<SortOrder>()
                .map(ParamValue::Order)
                .map_err(|reason| ValidationError::InvalidValue { field: spec.name, reason })
        }
    }
}

/// JSON Schema (draft 2020-12 subset) for the tool's `inputSchema`.
pub fn input_schema() -> JsonObject {
    let mut properties = JsonObject::new();
    for spec in PRODUCT_FIELDS {
        let mut prop = match spec.kind {
            FieldKind::String => json!({ "type": "string" }),
            FieldKind::Number => json!({ "type": "number" }),
            FieldKind::Order => json!({ "type": "string", "enum": ["asc", "desc"] }),
        };
        if let JsonValue::Object(obj) = &mut prop {
            obj.insert("description".into(), spec.description.into());
            if let Some(d) = spec.default {
                obj.insert("default".into(), d.into());
            }
        }
        properties.insert(spec.name.to_owned(), prop);
    }

    let mut schema = JsonObject::new();
    schema.insert("type".into(), "object".into());
    schema.insert("properties".into(), JsonValue::Object(properties));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryMode;

    fn obj(v: JsonValue) -> JsonObject {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn applies_pagination_defaults() {
        let p = normalize(&JsonObject::new()).unwrap();
        assert_eq!(p.skip(), Some(0.0));
        assert_eq!(p.limit(), Some(10.0));
        assert_eq!(p.len(), 2);
        assert_eq!(p.mode(), QueryMode::Filter);
    }

    #[test]
    fn keeps_supplied_pagination() {
        let p = normalize(&obj(json!({"skip": 20, "limit": 5}))).unwrap();
        assert_eq!(p.skip(), Some(20.0));
        assert_eq!(p.limit(), Some(5.0));
    }

    #[test]
    fn leaves_other_fields_absent() {
        let p = normalize(&obj(json!({"brand": "Apple"}))).unwrap();
        assert!(p.get("category").is_none());
        assert!(p.get("price").is_none());
        assert_eq!(p.get("brand"), Some(&ParamValue::Text("Apple".into())));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let err = normalize(&obj(json!({"price": "cheap"}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType { field: "price", expected: "number" }
        );
    }

    #[test]
    fn rejects_numeric_q() {
        let err = normalize(&obj(json!({"q": 42}))).unwrap_err();
        assert!(matches!(err, ValidationError::WrongType { field: "q", .. }));
    }

    #[test]
    fn rejects_order_outside_enum() {
        let err = normalize(&obj(json!({"order": "sideways"}))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { field: "order", .. }));
        let ok = normalize(&obj(json!({"order": "desc"}))).unwrap();
        assert_eq!(ok.get("order"), Some(&ParamValue::Order(SortOrder::Desc)));
    }

    #[test]
    fn pagination_accepts_any_number() {
        let p = normalize(&obj(json!({"skip": -1, "limit": 2.5}))).unwrap();
        assert_eq!(p.skip(), Some(-1.0));
        assert_eq!(p.limit(), Some(2.5));
        assert_eq!(p.get("limit").unwrap().to_string(), "2.5");
    }

    #[test]
    fn rejects_non_numeric_limit() {
        let err = normalize(&obj(json!({"limit": "ten"}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType { field: "limit", expected: "number" }
        );
    }

    #[test]
    fn null_is_absent_and_unknown_is_ignored() {
        let p = normalize(&obj(json!({"price": null, "color": "red"}))).unwrap();
        assert!(p.get("price").is_none());
        assert!(p.get("color").is_none());
    }

    #[test]
    fn schema_lists_every_field() {
        let schema = input_schema();
        assert_eq!(schema["type"], "object");
        let props = schema["properties"].as_object().unwrap();
        assert_eq!(props.len(), PRODUCT_FIELDS.len());
        assert_eq!(props["limit"]["default"], 10.0);
        assert_eq!(props["limit"]["type"], "number");
        assert_eq!(props["order"]["enum"], json!(["asc", "desc"]));
        assert_eq!(props["price"]["type"], "number");
    }
}
