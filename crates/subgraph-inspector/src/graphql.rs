//! Send GraphQL requests to a subgraph endpoint

use std::future::Future;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// A GraphQL request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphQLRequest {
    pub query: String,
    pub variables: Option<Map<String, Value>>,
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_variables(mut self, variables: Option<Map<String, Value>>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_operation_name(mut self, operation_name: Option<String>) -> Self {
        self.operation_name = operation_name;
        self
    }

    /// The JSON body to post. Empty variables and operation names are left out.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), Value::from(self.query.trim()));
        if let Some(variables) = self.variables.as_ref().filter(|v| !v.is_empty()) {
            body.insert("variables".to_string(), Value::Object(variables.clone()));
        }
        if let Some(operation_name) = self.operation_name.as_ref().filter(|n| !n.is_empty()) {
            body.insert("operationName".to_string(), Value::from(operation_name.as_str()));
        }
        Value::Object(body)
    }
}

/// An error sending a GraphQL request
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Request(reqwest::Error),

    #[error("{0}")]
    Status(reqwest::Error),

    #[error("Error decoding JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_status() {
            TransportError::Status(error)
        } else {
            TransportError::Request(error)
        }
    }
}

/// Able to deliver a GraphQL request and return the decoded response body
pub trait GraphQLTransport: Send + Sync {
    fn send(
        &self,
        request: &GraphQLRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// Posts GraphQL requests over HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport sending the given headers with every request. Requests taking longer
    /// than `timeout` fail with [`TransportError::Timeout`].
    pub fn new(
        endpoint: Url,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let headers = {
            let mut headers = headers;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers
        };
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GraphQLTransport for HttpTransport {
    async fn send(&self, request: &GraphQLRequest) -> Result<Value, TransportError> {
        debug!(
            endpoint = %self.endpoint,
            operation_name = ?request.operation_name,
            "Sending GraphQL request"
        );
        let body = self
            .client
            .post(self.endpoint.clone())
            .body(request.body().to_string())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let json: Value = serde_json::from_str(&body)?;
        debug!(response = %json, "Received GraphQL response");
        Ok(json)
    }
}

/// Run a query against the transport
pub async fn graphql_request<T: GraphQLTransport>(
    transport: &T,
    query: &str,
    variables: Option<Map<String, Value>>,
    operation_name: Option<&str>,
) -> Result<Value, TransportError> {
    let request = GraphQLRequest::new(query)
        .with_variables(variables)
        .with_operation_name(operation_name.map(str::to_string));
    transport.send(&request).await
}
