use std::net::SocketAddr;

use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::{StreamableHttpService, stdio};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::ServerError;

use super::{Running, Transport, shutdown_signal};

pub(super) struct Starting {
    pub(super) transport: Transport,
    pub(super) running: Running,
}

impl Starting {
    pub(super) async fn start(self) -> Result<(), ServerError> {
        match self.transport {
            Transport::StreamableHttp { address, port } => {
                info!(port = ?port, address = ?address, "Starting MCP server in Streamable HTTP mode");
                let running = self.running;
                let listen_address = SocketAddr::new(address, port);
                let service = StreamableHttpService::new(
                    move || Ok(running.clone()),
                    LocalSessionManager::default().into(),
                    Default::default(),
                );
                let router = axum::Router::new().nest_service("/mcp", service);

                let cancellation_token = CancellationToken::new();
                let shutdown = cancellation_token.clone();
                tokio::spawn(async move {
                    shutdown_signal().await;
                    info!("Shutting down MCP server");
                    shutdown.cancel();
                });

                let tcp_listener = tokio::net::TcpListener::bind(listen_address).await?;
                axum::serve(tcp_listener, router)
                    .with_graceful_shutdown(cancellation_token.cancelled_owned())
                    .await?;
            }
            Transport::Stdio => {
                info!("Starting MCP server in stdio mode");
                let service = self
                    .running
                    .serve(stdio())
                    .await
                    .inspect_err(|e| {
                        error!("serving error: {:?}", e);
                    })
                    .map_err(|e| ServerError::McpInitialize(e.to_string()))?;
                service.waiting().await?;
            }
        }

        Ok(())
    }
}
