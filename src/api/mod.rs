//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `/pokemon...` - Cached catalog lookups
//! - `/team...` - Team roster
//! - `/cache...` - Cache statistics and maintenance
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
