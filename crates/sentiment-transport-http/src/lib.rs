//! HTTP/JSON transport for the sentiment prediction service.
//! Exposes `POST /predict` plus health, metrics and API description routes.

mod error;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::HttpTransportError;
pub use router::{build_router, AppState};
pub use server::HttpServer;
