use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorCode, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    errors::McpError,
    graphql::HttpTransport,
    introspection::SchemaIntrospector,
    tools::{
        execute_query::{ExecuteQuery, GRAPHQL_REQUEST_TOOL_NAME},
        introspect_schema::{INTROSPECT_SCHEMA_TOOL_NAME, IntrospectSchema},
    },
};

#[derive(Clone)]
pub(super) struct Running {
    introspect_tool: IntrospectSchema<HttpTransport>,
    execute_tool: ExecuteQuery<HttpTransport>,
}

impl Running {
    pub(super) fn new(transport: HttpTransport) -> Self {
        Self {
            introspect_tool: IntrospectSchema::new(Arc::new(SchemaIntrospector::new(
                transport.clone(),
            ))),
            execute_tool: ExecuteQuery::new(Arc::new(transport)),
        }
    }

    fn tools(&self) -> Vec<Tool> {
        vec![self.introspect_tool.tool.clone(), self.execute_tool.tool.clone()]
    }

    #[tracing::instrument(skip_all, fields(tool = %request.name))]
    async fn call(&self, request: CallToolRequestParam) -> Result<CallToolResult, McpError> {
        debug!(arguments = ?request.arguments, "Calling tool");
        if request.name == INTROSPECT_SCHEMA_TOOL_NAME {
            self.introspect_tool.execute().await
        } else if request.name == GRAPHQL_REQUEST_TOOL_NAME {
            self.execute_tool.execute(convert_arguments(request)?).await
        } else {
            Err(tool_not_found(&request.name))
        }
    }
}

impl ServerHandler for Running {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(request).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tools(),
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Call `introspect_schema` to learn which entities the subgraph exposes, then query them with `graphql_request`.".to_string(),
            ),
            ..Default::default()
        }
    }
}

fn tool_not_found(name: &str) -> McpError {
    McpError::new(
        ErrorCode::METHOD_NOT_FOUND,
        format!("Tool {name} not found"),
        None,
    )
}

fn convert_arguments<T: serde::de::DeserializeOwned>(
    arguments: CallToolRequestParam,
) -> Result<T, McpError> {
    serde_json::from_value(Value::from(arguments.arguments))
        .map_err(|_| McpError::new(ErrorCode::INVALID_PARAMS, "Invalid input".to_string(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use std::time::Duration;

    fn running(url: &str) -> Running {
        Running::new(
            HttpTransport::new(url.parse().unwrap(), HeaderMap::new(), Duration::from_secs(5))
                .unwrap(),
        )
    }

    fn request(name: &str, arguments: Value) -> CallToolRequestParam {
        CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
        }
    }

    #[test]
    fn it_lists_both_tools() {
        let names: Vec<_> = running("http://127.0.0.1:4000")
            .tools()
            .into_iter()
            .map(|tool| tool.name)
            .collect();

        assert_eq!(names, vec!["introspect_schema", "graphql_request"]);
    }

    #[tokio::test]
    async fn unknown_tools_are_not_found() {
        let error = running("http://127.0.0.1:4000")
            .call(request("execute", json!({})))
            .await
            .unwrap_err();

        assert_eq!(error.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(error.message, "Tool execute not found");
    }

    #[tokio::test]
    async fn undecodable_arguments_are_invalid_params() {
        let error = running("http://127.0.0.1:4000")
            .call(request("graphql_request", json!({ "variables": {} })))
            .await
            .unwrap_err();

        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn it_routes_queries_to_the_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Json(
                json!({ "query": "{ factories { poolCount } }" }),
            ))
            .with_body(r#"{"data": {"factories": [{"poolCount": "42"}]}}"#)
            .expect(1)
            .create_async()
            .await;

        let result = running(&server.url())
            .call(request(
                "graphql_request",
                json!({ "query": "{ factories { poolCount } }" }),
            ))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn unreachable_endpoints_fail_introspection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;

        let result = running(&server.url())
            .call(request("introspect_schema", json!({})))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.content[0].as_text().map(|t| t.text.as_str()),
            Some("Error during introspection.")
        );
    }
}
