use tokio::net::TcpListener;

use docstore_store::Storage;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Docstore HTTP server.
pub struct DocstoreServer {
    config: ServerConfig,
}

impl DocstoreServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(Storage::open(&self.config.storage_root));
        build_router(state, self.config.max_body_size)
    }

    /// Bind the configured address and serve requests.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve requests on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        let app = self.router();
        tracing::info!(
            addr = %listener.local_addr()?,
            root = %self.config.storage_root.display(),
            "docstore server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
