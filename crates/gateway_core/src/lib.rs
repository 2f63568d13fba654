pub mod context;
pub mod domain;
pub mod enrich;
pub mod ports;
pub mod summary;
pub mod transfer;

pub use context::{parse_authorization, Identity, RequestContext, Role};
pub use domain::{
    AnalyzedItem, Bounds, Credentials, EnrichedTicket, ImageInfo, Measure, NewTicket,
    Registration, Suggestion, SummaryMap, SummaryRecord, Ticket, TicketFilter, TicketPage,
    TicketStatus, Tokens, User,
};
pub use ports::{
    AnalysisSink, AuthService, ChunkSink, ImageAnalyzer, ObjectStorage, PortError, PortResult,
    RecordStream, SuggestionService, TicketService, TicketSummaries, UploadSink, UserDirectory,
};
pub use transfer::{transfer, ByteSource, CHUNK_SIZE};
