//! An MCP server that lets an AI agent discover what a GraphQL subgraph exposes and query it.
//!
//! The `introspect_schema` tool runs the standard introspection query against the subgraph and
//! returns the categorized summary built by [`schema_summary`]. The `graphql_request` tool runs
//! arbitrary queries against the same endpoint.

pub mod errors;
pub mod graphql;
pub mod introspection;
pub mod json_schema;
pub mod server;
mod tools;
