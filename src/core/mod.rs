//! Core contracts: argument schema, normalization and the error model.

pub mod error;
pub mod schema;
