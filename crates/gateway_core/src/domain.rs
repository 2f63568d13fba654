//! crates/gateway_core/src/domain.rs
//!
//! Defines the pure, core data structures relayed by the gateway.
//! These structs are independent of the RPC wire format and of any JSON shape.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Login material sent to the auth backend.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub phone: String,
    pub password: String,
}

/// Everything the auth backend needs to register a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub phone: String,
    pub password: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
}

/// Access/refresh pair. Opaque to the gateway, only ever forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// An account profile owned by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub phone: String,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
}

impl User {
    /// Short label used by the per-user summary, e.g. `"I. P. Sidorov, +79990001122"`.
    ///
    /// Initials come from the first and middle names; missing parts are left out.
    pub fn display_name(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        for name in [&self.first_name, &self.middle_name] {
            if let Some(initial) = name.as_deref().and_then(|n| n.trim().chars().next()) {
                parts.push(format!("{}.", initial));
            }
        }
        if let Some(last) = self.last_name.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            parts.push(last.to_string());
        }

        if parts.is_empty() {
            format!("+{}", self.phone)
        } else {
            format!("{}, +{}", parts.join(" "), self.phone)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Waiting,
    Processing,
    Validation,
    Closed,
    Rejected,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Processing => "processing",
            TicketStatus::Validation => "validation",
            TicketStatus::Closed => "closed",
            TicketStatus::Rejected => "rejected",
        }
    }
}

/// The product the analyzer extracted from a ticket's photo.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedItem {
    pub product: String,
    pub description: String,
    pub price: f32,
    pub amount: Option<f32>,
    pub unit: Option<String>,
}

/// A support ticket as stored by the ticket backend. Only the owner id is known here.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub status: TicketStatus,
    pub image_url: String,
    pub shop_name: String,
    pub shop_addr: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub item: Option<AnalyzedItem>,
}

/// A ticket joined with its owner's profile. Built per response, never stored.
#[derive(Debug, Clone)]
pub struct EnrichedTicket {
    pub ticket: Ticket,
    pub user: Arc<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFilter {
    pub user_id: Option<String>,
    pub bounds: Bounds,
}

/// One page of tickets plus the total number of matching records.
#[derive(Debug, Clone)]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub user_id: String,
    pub shop_name: String,
    pub shop_addr: String,
    pub image_url: String,
}

/// One `(key, count)` row of a grouped-count summary stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    pub key: String,
    pub count: i64,
}

/// Fully drained summary, ordered by key.
pub type SummaryMap = BTreeMap<String, i64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub amount: f32,
    pub unit: String,
}

/// Structured extraction result returned by the image analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub product: String,
    pub description: String,
    pub price: f32,
    pub measure: Option<Measure>,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub title: String,
    pub subtitle: String,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> User {
        User {
            phone: "79990001122".to_string(),
            first_name: first.map(str::to_string),
            middle_name: middle.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn display_name_uses_initials_and_phone() {
        let u = user(Some("Ivan"), Some("Petrovich"), Some("Sidorov"));
        assert_eq!(u.display_name(), "I. P. Sidorov, +79990001122");
    }

    #[test]
    fn display_name_skips_missing_parts() {
        assert_eq!(
            user(Some("Иван"), None, Some("Сидоров")).display_name(),
            "И. Сидоров, +79990001122"
        );
        assert_eq!(user(None, None, None).display_name(), "+79990001122");
        assert_eq!(user(Some(""), None, Some(" ")).display_name(), "+79990001122");
    }
}
