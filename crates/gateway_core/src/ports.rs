//! crates/gateway_core/src/ports.rs
//!
//! Defines the service contracts (traits) the gateway core depends on.
//! Each backend capability is a port; the gRPC adapters in the service crate
//! implement them, and tests substitute in-memory fakes.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::context::{Identity, Role};
use crate::domain::{
    Credentials, ImageInfo, NewTicket, Registration, Suggestion, SummaryRecord, Ticket,
    TicketFilter, TicketPage, Tokens, User,
};

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The local error taxonomy. Remote status codes are translated into one of
/// these variants by the adapter method that made the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortError {
    /// The human-readable part of the error, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            PortError::InvalidRequest(m)
            | PortError::Unauthorized(m)
            | PortError::Forbidden(m)
            | PortError::NotFound(m)
            | PortError::InvalidPayload(m)
            | PortError::Internal(m) => m,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Records of a server-streaming call, yielded until the backend ends the stream.
pub type RecordStream<T> = Pin<Box<dyn Stream<Item = PortResult<T>> + Send>>;

//=========================================================================================
// Streaming Capability
//=========================================================================================

/// The send half of a client-streaming call: push frames in order, then close
/// and wait for the single reply.
///
/// Dropping a sink before `close_and_receive` cancels the underlying call.
#[async_trait]
pub trait ChunkSink: Send {
    type Reply: Send;

    async fn send(&mut self, chunk: Bytes) -> PortResult<()>;

    async fn close_and_receive(self: Box<Self>) -> PortResult<Self::Reply>;
}

pub type UploadSink = Box<dyn ChunkSink<Reply = String>>;
pub type AnalysisSink = Box<dyn ChunkSink<Reply = ImageInfo>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> PortResult<Tokens>;

    async fn sign_up(&self, registration: &Registration) -> PortResult<Tokens>;

    async fn sign_out(&self, access_token: &str) -> PortResult<()>;

    async fn refresh(&self, refresh_token: &str) -> PortResult<Tokens>;

    /// Asks the auth backend whether `access_token` holds `role`.
    /// The backend is the only authority on role sufficiency.
    async fn authenticate(&self, access_token: &str, role: Role) -> PortResult<Identity>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> PortResult<User>;
}

#[async_trait]
pub trait TicketService: Send + Sync {
    async fn find_by_id(&self, id: &str) -> PortResult<Ticket>;

    async fn list(&self, filter: &TicketFilter) -> PortResult<TicketPage>;

    /// Creates a ticket and returns its id.
    async fn create(&self, ticket: &NewTicket) -> PortResult<String>;

    /// Closes a ticket. An unknown id is reported as `PortError::NotFound`.
    async fn close(&self, id: &str) -> PortResult<()>;
}

/// Grouped-count summaries. Each call opens one server stream.
#[async_trait]
pub trait TicketSummaries: Send + Sync {
    async fn shop_summary(&self) -> PortResult<RecordStream<SummaryRecord>>;

    async fn user_summary(&self) -> PortResult<RecordStream<SummaryRecord>>;

    async fn status_summary(&self) -> PortResult<RecordStream<SummaryRecord>>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Opens an upload stream; every frame is tagged with `content_type`.
    /// The reply is the stored object's name.
    async fn open_upload(&self, content_type: &str) -> PortResult<UploadSink>;
}

#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn open_analysis(&self) -> PortResult<AnalysisSink>;
}

#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggestions(&self, lon: f32, lat: f32, count: u32) -> PortResult<Vec<Suggestion>>;
}
