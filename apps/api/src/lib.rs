//! # Kasir API
//!
//! HTTP front end for the Kasir POS backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasir API Server                               │
//! │                                                                         │
//! │  Client ───► axum (8080) ───► routes ───► kasir-db ───► SQLite        │
//! │                  │                            │                         │
//! │             TraceLayer                 CheckoutEngine                   │
//! │            (request spans)            (one transaction per checkout)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` only wires configuration, logging and the
//! listener; everything testable lives here.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use response::ApiResponse;
pub use routes::router;
pub use state::AppState;
