use std::sync::Arc;

use dtl_dispatch::Dispatcher;
use dtl_ledger::{Ledger, SystemClock, TxClock};
use dtl_store::{FileStateStore, StateStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{AppState, SharedDispatcher};
use crate::router::build_router;

/// DTL HTTP host.
pub struct DtlServer {
    config: ServerConfig,
    state: AppState,
}

impl DtlServer {
    pub fn new(config: ServerConfig, dispatcher: SharedDispatcher) -> Self {
        Self {
            config,
            state: AppState::new(dispatcher),
        }
    }

    /// Host the ledger over the snapshot file named in `config`, stamping
    /// transactions with the system clock.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let store: Arc<dyn StateStore> = Arc::new(FileStateStore::open(&config.state_path)?);
        let clock: Arc<dyn TxClock> = Arc::new(SystemClock::new());
        let dispatcher = Dispatcher::new(Ledger::new(store, clock));
        Ok(Self::new(config, dispatcher))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            bind = %self.config.bind_addr,
            state = %self.config.state_path.display(),
            "DTL server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
