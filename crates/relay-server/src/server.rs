//! HTTP server lifecycle.

use axum::Router;
use relay_config::ServerSettings;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use crate::{error::ServerError, routes::create_router, shutdown::shutdown_signal, state::AppState};

/// Listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Static asset directory, if any
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            static_dir: settings.static_dir.clone(),
        }
    }
}

impl ServerConfig {
    /// Parse the configured socket address
    ///
    /// # Errors
    /// Returns error if host and port do not form a valid address
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
                reason: e.to_string(),
                address,
            })
    }
}

/// The relay HTTP server
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router without binding
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), self.config.static_dir.as_deref())
    }

    /// Bind the configured address
    ///
    /// # Errors
    /// Returns error if the address is invalid or cannot be bound
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.socket_addr()?;
        TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address, source })
    }

    /// Serve until Ctrl+C or SIGTERM
    ///
    /// # Errors
    /// Returns error if binding or serving fails
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an existing listener until `shutdown` resolves
    ///
    /// In-flight requests are allowed to finish before this returns.
    ///
    /// # Errors
    /// Returns error if the serving loop fails
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        info!(
            address = %listener.local_addr()?,
            credentials = self.state.credentials().len(),
            static_dir = ?self.config.static_dir,
            "Image relay listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
