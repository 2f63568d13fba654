//! services/gateway/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use gateway_core::{
    AuthService, ImageAnalyzer, ObjectStorage, SuggestionService, TicketService, TicketSummaries,
    UserDirectory,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Every backend is held behind its port so tests can swap in in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserDirectory>,
    pub tickets: Arc<dyn TicketService>,
    pub summaries: Arc<dyn TicketSummaries>,
    pub storage: Arc<dyn ObjectStorage>,
    pub analyzer: Arc<dyn ImageAnalyzer>,
    pub suggestions: Arc<dyn SuggestionService>,
}
