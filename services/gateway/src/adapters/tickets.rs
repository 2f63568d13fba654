//! services/gateway/src/adapters/tickets.rs
//!
//! Adapter for the `ts.TicketService` backend. Implements `TicketService` and
//! `TicketSummaries`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use gateway_core::{
    AnalyzedItem, NewTicket, PortError, PortResult, RecordStream, SummaryRecord, Ticket,
    TicketFilter, TicketPage, TicketService, TicketStatus, TicketSummaries,
};
use tonic::transport::Channel;
use tonic::Code;
use tracing::debug;

use crate::adapters::proto::share;
use crate::adapters::proto::ts::{
    self as pb, ticket_service_client::TicketServiceClient, CloseRequest, CreateRequest, Empty,
    Filter, FindByIdRequest, ListRequest,
};
use crate::adapters::status::{lookup_failure, unexpected};

#[derive(Clone)]
pub struct GrpcTicketAdapter {
    client: TicketServiceClient<Channel>,
}

impl GrpcTicketAdapter {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: TicketServiceClient::new(channel),
        }
    }
}

//=========================================================================================
// Wire Conversions
//=========================================================================================

fn status_from_proto(status: pb::Status) -> TicketStatus {
    match status {
        pb::Status::Waiting => TicketStatus::Waiting,
        pb::Status::Processing => TicketStatus::Processing,
        pb::Status::Validation => TicketStatus::Validation,
        pb::Status::Closed => TicketStatus::Closed,
        pb::Status::Rejected => TicketStatus::Rejected,
    }
}

fn timestamp(seconds: i64) -> PortResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| PortError::Internal(format!("timestamp {} is out of range", seconds)))
}

fn ticket_from_proto(ticket: pb::Ticket) -> PortResult<Ticket> {
    let status = status_from_proto(ticket.status());
    Ok(Ticket {
        status,
        created_at: timestamp(ticket.created_at)?,
        updated_at: ticket.updated_at.map(timestamp).transpose()?,
        item: ticket.item.map(|item| AnalyzedItem {
            product: item.product,
            description: item.description,
            price: item.price,
            amount: item.amount,
            unit: item.unit,
        }),
        id: ticket.id,
        user_id: ticket.user_id,
        image_url: ticket.image_url,
        shop_name: ticket.shop_name,
        shop_addr: ticket.shop_addr,
        reason: ticket.reason,
    })
}

/// Maps every item of a server stream into a `SummaryRecord`.
fn records<T, F>(stream: tonic::Streaming<T>, into_record: F) -> RecordStream<SummaryRecord>
where
    T: Send + 'static,
    F: Fn(T) -> SummaryRecord + Send + 'static,
{
    Box::pin(stream.map(move |item| item.map(&into_record).map_err(unexpected)))
}

//=========================================================================================
// `TicketService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TicketService for GrpcTicketAdapter {
    async fn find_by_id(&self, id: &str) -> PortResult<Ticket> {
        let ticket = self
            .client
            .clone()
            .find_by_id(FindByIdRequest {
                ticket_id: id.to_string(),
            })
            .await
            .map_err(lookup_failure)?
            .into_inner();
        ticket_from_proto(ticket)
    }

    async fn list(&self, filter: &TicketFilter) -> PortResult<TicketPage> {
        let request = ListRequest {
            filter: Some(Filter {
                user_id: filter.user_id.clone(),
            }),
            bounds: Some(share::Bounds {
                limit: filter.bounds.limit,
                offset: filter.bounds.offset,
            }),
        };

        let reply = self
            .client
            .clone()
            .list(request)
            .await
            .map_err(unexpected)?
            .into_inner();
        debug!(received = reply.tickets.len(), total = reply.count, "listed tickets");

        let tickets = reply
            .tickets
            .into_iter()
            .map(ticket_from_proto)
            .collect::<PortResult<Vec<_>>>()?;
        Ok(TicketPage {
            tickets,
            total: reply.count,
        })
    }

    async fn create(&self, ticket: &NewTicket) -> PortResult<String> {
        let request = CreateRequest {
            user_id: ticket.user_id.clone(),
            shop_name: ticket.shop_name.clone(),
            shop_addr: ticket.shop_addr.clone(),
            image_url: ticket.image_url.clone(),
        };

        let reply = self
            .client
            .clone()
            .create(request)
            .await
            .map_err(unexpected)?;
        Ok(reply.into_inner().ticket_id)
    }

    async fn close(&self, id: &str) -> PortResult<()> {
        self.client
            .clone()
            .close(CloseRequest {
                ticket_id: id.to_string(),
            })
            .await
            .map_err(|status| match status.code() {
                Code::NotFound => PortError::NotFound(format!("ticket not found for id {}", id)),
                _ => unexpected(status),
            })?;
        Ok(())
    }
}

//=========================================================================================
// `TicketSummaries` Trait Implementation
//=========================================================================================

#[async_trait]
impl TicketSummaries for GrpcTicketAdapter {
    async fn shop_summary(&self) -> PortResult<RecordStream<SummaryRecord>> {
        let stream = self
            .client
            .clone()
            .get_shop_summary(Empty {})
            .await
            .map_err(unexpected)?
            .into_inner();
        Ok(records(stream, |r: pb::ShopSummaryRecord| SummaryRecord {
            key: r.shop_id,
            count: r.count,
        }))
    }

    async fn user_summary(&self) -> PortResult<RecordStream<SummaryRecord>> {
        let stream = self
            .client
            .clone()
            .get_user_summary(Empty {})
            .await
            .map_err(unexpected)?
            .into_inner();
        Ok(records(stream, |r: pb::UserSummaryRecord| SummaryRecord {
            key: r.user_id,
            count: r.count,
        }))
    }

    async fn status_summary(&self) -> PortResult<RecordStream<SummaryRecord>> {
        let stream = self
            .client
            .clone()
            .get_status_summary(Empty {})
            .await
            .map_err(unexpected)?
            .into_inner();
        Ok(records(stream, |r: pb::StatusSummaryRecord| SummaryRecord {
            key: r.status_id,
            count: r.count,
        }))
    }
}
