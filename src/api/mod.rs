//! HTTP API module for the inbound service surface.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
