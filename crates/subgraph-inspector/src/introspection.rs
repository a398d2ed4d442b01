//! Introspect a subgraph and summarize its schema

use schema_summary::{Classifier, INTROSPECTION_QUERY, SummaryError, summarize_response_with};
use tracing::error;

use crate::graphql::{GraphQLRequest, GraphQLTransport, TransportError};

/// The report returned in place of a summary when introspection fails
pub const INTROSPECTION_ERROR: &str = "Error during introspection.";

/// An error introspecting a subgraph
#[derive(Debug, thiserror::Error)]
pub enum IntrospectionError {
    #[error("Introspection request failed: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl IntrospectionError {
    /// A stable code identifying the kind of failure
    pub fn code(&self) -> &'static str {
        match self {
            IntrospectionError::Transport(_) => "TRANSPORT_ERROR",
            IntrospectionError::Summary(SummaryError::MissingData) => "MISSING_DATA",
            IntrospectionError::Summary(SummaryError::MalformedSchema) => "MALFORMED_SCHEMA",
        }
    }
}

/// Runs the introspection query against a transport and summarizes the result
pub struct SchemaIntrospector<T> {
    transport: T,
    classifier: Classifier,
}

impl<T: GraphQLTransport> SchemaIntrospector<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            classifier: Classifier::default(),
        }
    }

    /// Use a different set of classification rules
    pub fn with_classifier(self, classifier: Classifier) -> Self {
        Self { classifier, ..self }
    }

    /// Fetch the schema and render its summary
    pub async fn introspect(&self) -> Result<String, IntrospectionError> {
        let response = self
            .transport
            .send(&GraphQLRequest::new(INTROSPECTION_QUERY))
            .await?;

        Ok(summarize_response_with(&self.classifier, &response)?)
    }

    /// Fetch the schema and render its summary, or [`INTROSPECTION_ERROR`] on any failure
    pub async fn introspect_text(&self) -> String {
        self.introspect().await.unwrap_or_else(|e| {
            error!(code = e.code(), error = %e, "Introspection failed");
            INTROSPECTION_ERROR.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::HttpTransport;
    use mockito::Matcher;
    use reqwest::header::HeaderMap;
    use rstest::rstest;
    use schema_summary::{Category, ClassificationRule};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tracing_test::traced_test;

    struct Canned(Value);

    impl GraphQLTransport for Canned {
        async fn send(&self, _request: &GraphQLRequest) -> Result<Value, TransportError> {
            Ok(self.0.clone())
        }
    }

    struct TimesOut;

    impl GraphQLTransport for TimesOut {
        async fn send(&self, _request: &GraphQLRequest) -> Result<Value, TransportError> {
            Err(TransportError::Timeout)
        }
    }

    fn subgraph_response() -> Value {
        json!({
            "data": {
                "__schema": {
                    "types": [
                        {
                            "kind": "OBJECT",
                            "name": "Pool",
                            "fields": [
                                { "name": "feeTier", "args": [], "type": { "kind": "SCALAR", "name": "BigInt" } },
                                { "name": "poolDayData", "args": [{ "name": "skip" }], "type": { "kind": "LIST" } },
                            ]
                        },
                        {
                            "kind": "OBJECT",
                            "name": "Pools",
                            "fields": [
                                { "name": "totalValueLockedUSD", "args": [], "type": { "kind": "SCALAR", "name": "BigDecimal" } },
                            ]
                        },
                        {
                            "kind": "ENUM",
                            "name": "OrderDirection",
                            "enumValues": [{ "name": "asc" }, { "name": "desc" }],
                            "fields": null
                        },
                    ]
                }
            }
        })
    }

    #[tokio::test]
    async fn it_summarizes_the_introspected_schema() {
        let report = SchemaIntrospector::new(Canned(subgraph_response()))
            .introspect()
            .await
            .unwrap();

        assert!(report.contains("  Entity: Pool\n    - feeTier\n    - poolDayData\n\n"));
        assert!(report.contains("  Entity: Pools\n    - totalValueLockedUSD\n\n"));
        assert!(!report.contains("OrderDirection"));
    }

    #[rstest]
    #[case(json!({ "errors": [{ "message": "not allowed" }] }), "MISSING_DATA")]
    #[case(json!({ "data": { "__schema": {} } }), "MALFORMED_SCHEMA")]
    #[tokio::test]
    async fn invalid_responses_have_stable_codes(#[case] response: Value, #[case] code: &str) {
        let error = SchemaIntrospector::new(Canned(response))
            .introspect()
            .await
            .unwrap_err();

        assert_eq!(error.code(), code);
    }

    #[tokio::test]
    async fn transport_failures_become_the_error_report() {
        let introspector = SchemaIntrospector::new(TimesOut);

        assert_eq!(
            introspector.introspect().await.unwrap_err().code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(introspector.introspect_text().await, INTROSPECTION_ERROR);
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_data_becomes_the_error_report() {
        let introspector = SchemaIntrospector::new(Canned(json!({ "errors": [] })));

        assert_eq!(
            introspector.introspect_text().await,
            "Error during introspection."
        );
        assert!(logs_contain("MISSING_DATA"));
    }

    struct NothingIsSpecific;

    impl ClassificationRule for NothingIsSpecific {
        fn category(&self) -> Category {
            Category::OtherEntities
        }

        fn matches(&self, _entity_name: &str, _args_required: bool) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn custom_classifiers_are_used() {
        let report = SchemaIntrospector::new(Canned(subgraph_response()))
            .with_classifier(Classifier::new(vec![Box::new(NothingIsSpecific)]))
            .introspect()
            .await
            .unwrap();

        let other = report.find("Category: Other Entities").unwrap();
        assert!(report.find("  Entity: Pool\n").unwrap() > other);
        assert!(report.find("  Entity: Pools\n").unwrap() > other);
    }

    #[tokio::test]
    async fn it_sends_the_introspection_query_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!({ "query": INTROSPECTION_QUERY.trim() })))
            .with_body(subgraph_response().to_string())
            .expect(1)
            .create_async()
            .await;
        let transport = HttpTransport::new(
            server.url().parse().unwrap(),
            HeaderMap::new(),
            Duration::from_secs(5),
        )
        .unwrap();

        let report = SchemaIntrospector::new(transport).introspect_text().await;

        mock.assert_async().await;
        assert!(report.starts_with("Category: Specific Entity Queries"));
        assert!(report.contains("  Entity: Pool\n"));
    }
}
