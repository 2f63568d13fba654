pub mod analyzer;
pub mod auth;
pub mod proto;
pub mod status;
pub mod storage;
pub mod streaming;
pub mod suggestions;
pub mod tickets;

pub use analyzer::GrpcAnalyzerAdapter;
pub use auth::GrpcAuthAdapter;
pub use storage::GrpcStorageAdapter;
pub use suggestions::GrpcSuggestionAdapter;
pub use tickets::GrpcTicketAdapter;

use crate::config::ServiceEndpoint;
use tonic::transport::{Channel, Endpoint};

/// Builds a lazily connected channel; the first call on it dials the backend.
pub fn connect(endpoint: &ServiceEndpoint) -> Result<Channel, tonic::transport::Error> {
    Ok(Endpoint::from_shared(endpoint.uri())?.connect_lazy())
}
