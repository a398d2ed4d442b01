use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, Tool};
use rmcp::schemars::JsonSchema;
use rmcp::{schemars, serde_json};
use serde::Deserialize;

use crate::errors::McpError;
use crate::graphql::GraphQLTransport;
use crate::introspection::{INTROSPECTION_ERROR, SchemaIntrospector};
use crate::schema_from_type;

/// The name of the tool to summarize the subgraph schema
pub(crate) const INTROSPECT_SCHEMA_TOOL_NAME: &str = "introspect_schema";

/// A tool summarizing the entities of the subgraph and how to query them
pub struct IntrospectSchema<T> {
    introspector: Arc<SchemaIntrospector<T>>,
    pub tool: Tool,
}

impl<T> Clone for IntrospectSchema<T> {
    fn clone(&self) -> Self {
        Self {
            introspector: self.introspector.clone(),
            tool: self.tool.clone(),
        }
    }
}

/// The tool takes no input
#[derive(JsonSchema, Deserialize)]
pub struct Input {}

impl<T: GraphQLTransport> IntrospectSchema<T> {
    pub fn new(introspector: Arc<SchemaIntrospector<T>>) -> Self {
        Self {
            introspector,
            tool: Tool::new(
                INTROSPECT_SCHEMA_TOOL_NAME,
                "Summarize the GraphQL schema of the subgraph. Entities are grouped into queries for a single entity (which require arguments such as an ID), list queries (which accept optional filtering, sorting and pagination arguments), and other entities, each with its queryable fields. Use this before writing queries for the `graphql_request` tool.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self) -> Result<CallToolResult, McpError> {
        let report = self.introspector.introspect_text().await;
        // A summary always starts with a category header, so it never equals the error report
        let is_error = (report == INTROSPECTION_ERROR).then_some(true);

        Ok(CallToolResult {
            content: vec![Content::text(report)],
            is_error,
        })
    }
}
