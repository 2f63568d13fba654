//! crates/gateway_core/src/enrich.rs
//!
//! Joins ticket records from the ticket backend with the owner profiles held
//! by the auth backend.

use std::sync::Arc;
use tracing::debug;

use crate::context::RequestContext;
use crate::domain::{EnrichedTicket, Ticket};
use crate::ports::{PortError, PortResult, UserDirectory};

/// Resolves the owner of every ticket independently.
///
/// Any failed lookup fails the whole page with `NotFound`; no partial page is returned.
pub async fn enrich_page(
    ctx: &RequestContext,
    users: &dyn UserDirectory,
    tickets: Vec<Ticket>,
) -> PortResult<Vec<EnrichedTicket>> {
    let mut enriched = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        let user = users.find_user_by_id(&ticket.user_id).await.map_err(|e| {
            debug!(parent: ctx.span(), ticket_id = %ticket.id, error = %e, "owner lookup failed");
            PortError::NotFound(format!("owner of ticket {} not found", ticket.id))
        })?;
        enriched.push(EnrichedTicket {
            ticket,
            user: Arc::new(user),
        });
    }
    Ok(enriched)
}

/// Enriches a page whose tickets all belong to `owner_id`.
///
/// Only valid for owner-homogeneous pages (e.g. the caller's own tickets): the
/// owner is resolved at most once and every entry shares the same `User`.
pub async fn enrich_owned_page(
    ctx: &RequestContext,
    users: &dyn UserDirectory,
    owner_id: &str,
    tickets: Vec<Ticket>,
) -> PortResult<Vec<EnrichedTicket>> {
    if tickets.is_empty() {
        return Ok(Vec::new());
    }

    let owner = users.find_user_by_id(owner_id).await.map_err(|e| {
        debug!(parent: ctx.span(), owner_id, error = %e, "owner lookup failed");
        PortError::NotFound(format!("user {} not found", owner_id))
    })?;
    let owner = Arc::new(owner);

    Ok(tickets
        .into_iter()
        .map(|ticket| EnrichedTicket {
            ticket,
            user: Arc::clone(&owner),
        })
        .collect())
}

/// Enriches a single ticket. Lookup errors are returned unchanged.
pub async fn enrich_one(users: &dyn UserDirectory, ticket: Ticket) -> PortResult<EnrichedTicket> {
    let user = users.find_user_by_id(&ticket.user_id).await?;
    Ok(EnrichedTicket {
        ticket,
        user: Arc::new(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TicketStatus, User};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingDirectory {
        users: HashMap<String, User>,
        calls: AtomicUsize,
        failure: Option<PortError>,
    }

    impl CountingDirectory {
        fn with_users(ids: &[&str]) -> Self {
            let users = ids
                .iter()
                .map(|id| {
                    (
                        id.to_string(),
                        User {
                            phone: format!("7999{}", id),
                            last_name: Some(format!("Last-{}", id)),
                            first_name: None,
                            middle_name: None,
                        },
                    )
                })
                .collect();
            Self {
                users,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl UserDirectory for CountingDirectory {
        async fn find_user_by_id(&self, id: &str) -> PortResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(failure) = &self.failure {
                return Err(failure.clone());
            }
            self.users
                .get(id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("user {}", id)))
        }
    }

    fn ticket(id: &str, owner: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            user_id: owner.to_string(),
            status: TicketStatus::Waiting,
            image_url: format!("{}.png", id),
            shop_name: "Shop".to_string(),
            shop_addr: "Main st. 1".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            reason: None,
            item: None,
        }
    }

    #[tokio::test]
    async fn general_page_resolves_each_owner() {
        let users = CountingDirectory::with_users(&["a", "b"]);
        let tickets = vec![ticket("t1", "a"), ticket("t2", "b"), ticket("t3", "a")];

        let page = enrich_page(&RequestContext::new(), &users, tickets).await.unwrap();

        assert_eq!(users.calls.load(Ordering::SeqCst), 3);
        let owners: Vec<_> = page.iter().map(|e| e.user.phone.as_str()).collect();
        assert_eq!(owners, vec!["7999a", "7999b", "7999a"]);
    }

    #[tokio::test]
    async fn general_page_fails_whole_on_missing_owner() {
        let users = CountingDirectory::with_users(&["a"]);
        let tickets = vec![ticket("t1", "a"), ticket("t2", "ghost"), ticket("t3", "a")];

        let err = enrich_page(&RequestContext::new(), &users, tickets)
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(users.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn owned_page_resolves_owner_once() {
        let users = CountingDirectory::with_users(&["me"]);
        let tickets = vec![ticket("t1", "me"), ticket("t2", "me"), ticket("t3", "me")];

        let page = enrich_owned_page(&RequestContext::new(), &users, "me", tickets)
            .await
            .unwrap();

        assert_eq!(users.calls.load(Ordering::SeqCst), 1);
        assert_eq!(page.len(), 3);
        assert!(page.iter().all(|e| Arc::ptr_eq(&e.user, &page[0].user)));
    }

    #[tokio::test]
    async fn owned_empty_page_makes_no_lookup() {
        let users = CountingDirectory::with_users(&[]);

        let page = enrich_owned_page(&RequestContext::new(), &users, "me", Vec::new())
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(users.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn owned_page_maps_lookup_failure_to_not_found() {
        let users = CountingDirectory {
            failure: Some(PortError::Internal("connection refused".to_string())),
            ..Default::default()
        };

        let err = enrich_owned_page(&RequestContext::new(), &users, "me", vec![ticket("t1", "me")])
            .await
            .unwrap_err();

        assert_eq!(err, PortError::NotFound("user me not found".to_string()));
    }

    #[tokio::test]
    async fn single_ticket_propagates_lookup_error() {
        let users = CountingDirectory {
            failure: Some(PortError::Internal("connection refused".to_string())),
            ..Default::default()
        };

        let err = enrich_one(&users, ticket("t1", "a")).await.unwrap_err();

        assert_eq!(err, PortError::Internal("connection refused".to_string()));
    }
}
