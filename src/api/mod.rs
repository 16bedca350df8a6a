//! API layer - HTTP endpoints

pub mod admin;
pub mod ask;
pub mod health;
pub mod metrics;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
