//! API server

use crate::handler::{self, AppState};
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracetime_replay::{ReplaySession, SessionConfig};
use tracetime_storage::FsBlobStore;
use tracetime_trace::TraceBundle;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
    /// Trace bundle directory
    pub trace_dir: PathBuf,
    /// Replay session options
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            trace_dir: PathBuf::from("trace"),
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Set the listen address
    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Set the trace bundle directory
    #[must_use]
    pub fn with_trace_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.trace_dir = dir.into();
        self
    }

    /// Set the session options
    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

/// Build the replay router over a session
pub fn build_router(session: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .route("/snapshot/{page_id}/{frame_id}", get(handler::snapshot))
        .route("/snapshot/{page_id}/{frame_id}/resource", get(handler::sub_resource))
        .route("/resource/{resource_id}", get(handler::resource))
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}

/// HTTP server over one trace bundle
#[derive(Debug)]
pub struct ApiServer {
    config: ServerConfig,
    session: AppState,
}

impl ApiServer {
    /// Load the bundle and build every index
    ///
    /// # Errors
    ///
    /// Returns error if the bundle can not be opened or parsed
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let trace_dir = config.trace_dir.clone();
        let session_config = config.session.clone();

        let session = tokio::task::spawn_blocking(move || -> anyhow::Result<ReplaySession> {
            let bundle = TraceBundle::open(&trace_dir)?;
            let store = FsBlobStore::new(bundle.resources_dir());
            Ok(ReplaySession::new(bundle.into_model(), Arc::new(store)).with_config(session_config))
        })
        .await??;

        Ok(Self::from_session(config, Arc::new(session)))
    }

    /// Wrap an already built session
    #[must_use]
    pub fn from_session(config: ServerConfig, session: AppState) -> Self {
        Self { config, session }
    }

    /// Shared session
    #[must_use]
    pub fn session(&self) -> &AppState {
        &self.session
    }

    /// Router for this server
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.session))
    }

    /// Bind and serve until the process stops
    ///
    /// # Errors
    ///
    /// Returns error if the address can not be bound
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&self.config.bind).await?;

        tracing::info!("Serving trace {} at http://{}", self.config.trace_dir.display(), listener.local_addr()?);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
