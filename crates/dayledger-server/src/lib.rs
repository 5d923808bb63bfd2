//! HTTP service for dayledger.
//!
//! This crate serves assembled schedules over a small HTTP/1.1 surface:
//! - `GET /calendar?from=YYYY-MM-DD&to=YYYY-MM-DD` returns the day ledger as JSON
//! - `GET /health` answers `{"status":"ok"}`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use dayledger_core::ScheduleConfig;
//! use dayledger_providers::ProviderSettings;
//! use dayledger_server::{
//!     HttpServer, RequestHandler, ScheduleService, ServerConfig, SignalHandler,
//!     make_connection_handler,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ProviderSettings::default().build();
//!     let service = Arc::new(ScheduleService::new(ScheduleConfig::default(), provider)?);
//!     let handler = Arc::new(RequestHandler::new(service));
//!
//!     let signals = SignalHandler::new();
//!     signals.spawn_listener();
//!
//!     let server = HttpServer::bind(ServerConfig::default()).await?;
//!     server
//!         .run_until_shutdown(make_connection_handler(handler), signals.shutdown().wait())
//!         .await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
pub mod http;
mod listener;
mod service;
mod signals;

pub use config::{DEFAULT_MAX_REQUEST_BYTES, DEFAULT_PORT, ServerConfig, default_bind_addr};
pub use error::{ServerError, ServerResult};
pub use handler::{RequestHandler, make_connection_handler};
pub use http::{HttpRequest, HttpResponse, StatusCode};
pub use listener::{Connection, HttpServer};
pub use service::ScheduleService;
pub use signals::{ShutdownHandle, ShutdownSignal, SignalHandler};
