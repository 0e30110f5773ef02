//! QRPG Dashboard - browser interface for quantum random passwords.
//!
//! Serves a single page with the generator form (backend, token, length) and a
//! small JSON API behind it:
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/api/health` | GET | liveness |
//! | `/api/options` | GET | length bounds and backend choices |
//! | `/api/circuit` | GET | diagram and OpenQASM of the password circuit |
//! | `/api/generate` | POST | run one generation |
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qrpg_core::QrpgConfig;
//! use qrpg_dashboard::{AppState, create_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = QrpgConfig::default();
//!     let state = Arc::new(AppState::from_config(&config).unwrap());
//!
//!     let app = create_router(state.clone());
//!     let listener = tokio::net::TcpListener::bind(state.config.bind_address).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use dto::{
    BackendOption, CircuitView, GenerateRequest, HealthResponse, LengthOptions, OptionsResponse,
};
pub use error::{ApiError, RunFailure};
pub use server::create_router;
pub use state::{AppState, DashboardConfig};
