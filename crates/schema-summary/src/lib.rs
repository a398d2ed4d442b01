//! Library for summarizing GraphQL introspection results as categorized text.
//!
//! A summary is built in three steps:
//!
//! * The queryable fields of every type are extracted ([`extract`]). Internal fields such as
//!   `__typename`, `*_filter` and `*_orderBy` inputs, and lower-case-only names are dropped.
//!   Fields inlining another type are followed by that type's fields.
//! * Types are classified ([`classify`]) as lookups of a single entity, list queries, or other
//!   entities, using rules over the entity name and whether its fields take arguments.
//! * The classified entities are rendered ([`render`]) as one text section per category.
//!
//! The output is intended as grounding for an LLM agent before it writes queries against a
//! subgraph. Everything here is synchronous and free of I/O; fetching the introspection result
//! is left to the caller.

use serde_json::Value;
use tracing::debug;

pub mod classify;
pub mod error;
pub mod extract;
pub mod introspection;
pub mod render;

pub use classify::{Category, ClassificationRule, Classifier, ClassifiedSchema, classify};
pub use error::SummaryError;
pub use extract::{FieldExtraction, FieldInfo, extract_fields};
pub use introspection::{INTROSPECTION_QUERY, IntrospectedSchema, IntrospectedType};
pub use render::render;

/// Summarize a full introspection response, which must contain `data`, using the default rules
pub fn summarize_response(response: &Value) -> Result<String, SummaryError> {
    summarize_response_with(&Classifier::default(), response)
}

/// Summarize a full introspection response, classifying its types with the given rules
pub fn summarize_response_with(
    classifier: &Classifier,
    response: &Value,
) -> Result<String, SummaryError> {
    let data = response.get("data").ok_or(SummaryError::MissingData)?;
    let schema = IntrospectedSchema::from_data(data)?;
    debug!(types = schema.types.len(), "Introspected schema");

    Ok(render(&classifier.classify(&schema.types)))
}
