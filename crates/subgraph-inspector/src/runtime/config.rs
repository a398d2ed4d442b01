use std::time::Duration;

use reqwest::header::HeaderMap;
use schemars::JsonSchema;
use serde::Deserialize;
use subgraph_inspector::server::Transport;
use url::Url;

use super::{endpoint::Endpoint, logging::Logging};

/// Configuration for the MCP server
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The GraphQL endpoint of the subgraph
    #[schemars(schema_with = "Url::json_schema")]
    pub endpoint: Endpoint,

    /// List of hard-coded headers to include in all GraphQL requests
    #[serde(deserialize_with = "parsers::map_from_str")]
    #[schemars(schema_with = "super::schemas::header_map")]
    pub headers: HeaderMap,

    /// How long to wait for the subgraph to answer a request, e.g. `30s` or `5m`
    #[serde(deserialize_with = "humantime_serde::deserialize")]
    #[schemars(with = "String")]
    pub timeout: Duration,

    /// Logging configuration
    pub logging: Logging,

    /// The type of server transport to use
    pub transport: Transport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            headers: HeaderMap::default(),
            timeout: defaults::timeout(),
            logging: Logging::default(),
            transport: Transport::default(),
        }
    }
}

mod defaults {
    use std::time::Duration;

    pub(super) const fn timeout() -> Duration {
        Duration::from_secs(300)
    }
}

mod parsers {
    use std::str::FromStr;

    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use serde::Deserializer;

    pub(super) fn map_from_str<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapFromStrVisitor;
        impl<'de> serde::de::Visitor<'de> for MapFromStrVisitor {
            type Value = HeaderMap;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of header string keys and values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut parsed = HeaderMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    let key = HeaderName::from_str(&key)
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;
                    let value = HeaderValue::from_str(&value)
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;

                    parsed.insert(key, value);
                }

                Ok(parsed)
            }
        }

        deserializer.deserialize_map(MapFromStrVisitor)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use subgraph_inspector::server::Transport;

    use super::Config;

    #[test]
    fn it_parses_a_minimal_config() {
        let config = serde_json::from_str::<Config>("{}").unwrap();

        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:4000/");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.headers.is_empty());
        assert!(matches!(config.transport, Transport::Stdio));
    }

    #[test]
    fn it_parses_a_full_config() {
        let config = serde_json::from_value::<Config>(serde_json::json!({
            "endpoint": "https://api.example.com/subgraphs/name/uniswap/v3",
            "headers": { "Authorization": "Bearer abc" },
            "timeout": "45s",
            "logging": { "level": "debug", "rotation": "daily" },
            "transport": { "type": "streamable_http", "port": 8080 },
        }))
        .unwrap();

        assert_eq!(
            config.endpoint.as_str(),
            "https://api.example.com/subgraphs/name/uniswap/v3"
        );
        assert_eq!(config.headers.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.logging.level, tracing::Level::DEBUG);
        assert!(matches!(
            config.transport,
            Transport::StreamableHttp { port: 8080, .. }
        ));
    }

    #[test]
    fn it_rejects_invalid_headers() {
        let result = serde_json::from_value::<Config>(serde_json::json!({
            "headers": { "bad header": "value" },
        }));

        assert!(result.is_err());
    }

    #[test]
    fn it_contains_no_keys_with_double_underscore() {
        // The env functionality of the config expansion uses __ as a split key
        // when determining nested fields of any of the fields of the Config.
        // This test ensures that a field name isn't added that can no longer be
        // configured using the env extractor.
        //
        // See [runtime::read_config]
        let schema = schemars::schema_for!(Config).to_value().to_string();

        assert!(!schema.contains("__"))
    }
}
