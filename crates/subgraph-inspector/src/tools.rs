//! MCP tools to allow an AI agent to inspect a subgraph schema and query it.

pub(crate) mod execute_query;
pub(crate) mod introspect_schema;
