//! VRM API
//!
//! HTTP surface for the vehicle data enrichment service.

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
