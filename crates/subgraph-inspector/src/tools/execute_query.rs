use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, ErrorCode, Tool};
use rmcp::schemars::JsonSchema;
use rmcp::serde_json::{Map, Value};
use rmcp::{schemars, serde_json};
use serde::Deserialize;
use tracing::{debug, error};

use crate::errors::McpError;
use crate::graphql::{GraphQLTransport, graphql_request};
use crate::schema_from_type;

/// The name of the tool to run a GraphQL query against the subgraph
pub(crate) const GRAPHQL_REQUEST_TOOL_NAME: &str = "graphql_request";

/// A tool to run an arbitrary GraphQL query against the subgraph
pub struct ExecuteQuery<T> {
    transport: Arc<T>,
    pub tool: Tool,
}

impl<T> Clone for ExecuteQuery<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            tool: self.tool.clone(),
        }
    }
}

#[derive(JsonSchema, Deserialize)]
pub struct Input {
    /// The GraphQL query
    query: String,

    /// The variable values, as a JSON object or a string containing one
    variables: Option<Value>,

    /// The name of the operation to run, if the query defines more than one
    operation_name: Option<String>,
}

impl<T: GraphQLTransport> ExecuteQuery<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            tool: Tool::new(
                GRAPHQL_REQUEST_TOOL_NAME,
                "Run a GraphQL query against the subgraph and return the JSON response. Use the `introspect_schema` tool first to find the entities and fields that can be queried.",
                schema_from_type!(Input),
            ),
        }
    }

    pub async fn execute(&self, input: Input) -> Result<CallToolResult, McpError> {
        let variables = parse_variables(input.variables)?;
        debug!(query = %input.query, "Running GraphQL request");

        Ok(
            match graphql_request(
                self.transport.as_ref(),
                &input.query,
                variables,
                input.operation_name.as_deref(),
            )
            .await
            {
                Ok(json) => CallToolResult {
                    content: vec![Content::json(&json).unwrap_or(Content::text(json.to_string()))],
                    is_error: Some(
                        json.get("errors")
                            .filter(|value| !matches!(value, Value::Null))
                            .is_some()
                            && json
                                .get("data")
                                .filter(|value| !matches!(value, Value::Null))
                                .is_none(),
                    ),
                },
                Err(e) => {
                    error!(error = %e, "GraphQL request failed");
                    CallToolResult {
                        content: vec![Content::text(e.to_string())],
                        is_error: Some(true),
                    }
                }
            },
        )
    }
}

fn parse_variables(variables: Option<Value>) -> Result<Option<Map<String, Value>>, McpError> {
    match variables {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => serde_json::from_str(&s).map(Some).map_err(|_| {
            McpError::new(ErrorCode::INVALID_PARAMS, "Invalid input".to_string(), None)
        }),
        Some(Value::Object(obj)) => Ok(Some(obj)),
        _ => Err(McpError::new(
            ErrorCode::INVALID_PARAMS,
            "Invalid input".to_string(),
            None,
        )),
    }
}
