pub mod analyzer;
pub mod auth;
pub mod context;
pub mod dto;
pub mod form;
pub mod guard;
pub mod response;
pub mod rest;
pub mod state;
pub mod suggestions;
pub mod summary;
pub mod tickets;

// Re-export what the binaries need to assemble and document the server.
pub use rest::{build_router, ApiDoc};
pub use state::AppState;
