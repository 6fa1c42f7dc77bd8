//! # checkout-api
//!
//! HTTP API layer for umbrella-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Pricing and stateless summary endpoints
//! - Checkout sessions driven by UI actions
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/pricing` | Product, shipping and payment options |
//! | POST | `/api/v1/summary` | Order summary for a quantity and shipping type |
//! | POST | `/api/v1/sessions` | Open a checkout session |
//! | GET | `/api/v1/sessions/{id}` | Session view-model |
//! | POST | `/api/v1/sessions/{id}/actions` | Dispatch a UI action |
//! | DELETE | `/api/v1/sessions/{id}` | Close a session |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, SessionStore};
