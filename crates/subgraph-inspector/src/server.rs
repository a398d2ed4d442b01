use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use bon::bon;
use reqwest::header::HeaderMap;
use schemars::JsonSchema;
use serde::Deserialize;
use url::Url;

use crate::errors::ServerError;
use crate::graphql::HttpTransport;

mod running;
mod starting;

use running::Running;
use starting::Starting;

/// An MCP server exposing a subgraph's schema summary and a query tool
pub struct Server {
    transport: Transport,
    endpoint: Url,
    headers: HeaderMap,
    timeout: Duration,
}

/// How the server talks to MCP clients
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transport {
    /// Use standard IO for communication
    #[default]
    Stdio,

    /// Host the MCP server on the supplied configuration, using streamable HTTP messages
    StreamableHttp {
        /// The IP address to bind to
        #[serde(default = "Transport::default_address")]
        address: IpAddr,

        /// The port to bind to
        #[serde(default = "Transport::default_port")]
        port: u16,
    },
}

impl Transport {
    fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn default_port() -> u16 {
        5000
    }
}

#[bon]
impl Server {
    #[builder]
    pub fn new(
        transport: Transport,
        endpoint: Url,
        #[builder(default)] headers: HeaderMap,
        #[builder(default = Duration::from_secs(300))] timeout: Duration,
    ) -> Self {
        Self {
            transport,
            endpoint,
            headers,
            timeout,
        }
    }

    pub async fn start(self) -> Result<(), ServerError> {
        let transport = HttpTransport::new(self.endpoint, self.headers, self.timeout)?;

        Starting {
            transport: self.transport,
            running: Running::new(transport),
        }
        .start()
        .await
    }
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
