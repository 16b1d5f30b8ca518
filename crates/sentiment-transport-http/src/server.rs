//! HTTP server that binds the axum router to a TCP socket.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use sentiment_runtime::Predictor;

use crate::error::HttpTransportError;
use crate::router::{build_router, AppState};

/// Axum-based HTTP server for the prediction service.
pub struct HttpServer {
    pub(crate) addr: String,
    pub(crate) state: AppState,
}

impl HttpServer {
    /// Creates a new HTTP server.
    ///
    /// # Arguments
    ///
    /// * `predictor` - shared model pool (or any other predictor)
    /// * `host` - interface to bind, e.g. `127.0.0.1`
    /// * `port` - TCP port to listen on
    pub fn new(predictor: Arc<dyn Predictor>, host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            state: AppState::new(predictor),
        }
    }

    /// Address the server will bind.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Starts the server and blocks until it exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run(self) -> Result<(), HttpTransportError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` completes, then stops accepting connections
    /// and waits for in-flight requests to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), HttpTransportError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| HttpTransportError::Bind {
                addr: self.addr.clone(),
                source: e,
            })?;

        let local = listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.addr.clone());
        tracing::info!(addr = %local, "sentiment HTTP server ready");

        let router = build_router(self.state);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| HttpTransportError::Serve(e.to_string()))?;

        tracing::info!("sentiment HTTP server stopped");
        Ok(())
    }
}
