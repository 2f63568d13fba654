//! services/gateway/src/web/dto.rs
//!
//! JSON request and response payloads. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use gateway_core::{
    AnalyzedItem, EnrichedTicket, ImageInfo, Measure, Suggestion, SummaryMap, Tokens, User,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

use crate::web::response::ApiFailure;

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignInRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub phone: String,
    pub password: String,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TicketListQuery {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    pub user_id: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionsQuery {
    pub lon: Option<f32>,
    pub lat: Option<f32>,
    pub count: Option<u32>,
}

//=========================================================================================
// Validation
//=========================================================================================

/// Phone numbers are exactly 11 digits, without the leading `+`.
pub fn validate_phone(phone: &str) -> Result<(), ApiFailure> {
    if phone.len() == 11 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ApiFailure::bad_request("phone must be exactly 11 digits"))
    }
}

pub fn require(field: &str, value: &str) -> Result<(), ApiFailure> {
    if value.trim().is_empty() {
        Err(ApiFailure::bad_request(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

//=========================================================================================
// Response Payloads
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokensDto {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<Tokens> for TokensDto {
    fn from(tokens: Tokens) -> Self {
        Self {
            access_token: tokens.access,
            refresh_token: tokens.refresh,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub phone: String,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            phone: user.phone.clone(),
            last_name: user.last_name.clone(),
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub product: String,
    pub description: String,
    pub price: f32,
    pub amount: Option<f32>,
    pub unit: Option<String>,
}

impl From<AnalyzedItem> for ItemDto {
    fn from(item: AnalyzedItem) -> Self {
        Self {
            product: item.product,
            description: item.description,
            price: item.price,
            amount: item.amount,
            unit: item.unit,
        }
    }
}

/// A ticket together with its owner's profile.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub image_url: String,
    pub shop_name: String,
    pub shop_addr: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub item: Option<ItemDto>,
    pub user: UserDto,
}

impl From<EnrichedTicket> for TicketDto {
    fn from(enriched: EnrichedTicket) -> Self {
        let EnrichedTicket { ticket, user } = enriched;
        Self {
            status: ticket.status.as_str().to_string(),
            item: ticket.item.map(ItemDto::from),
            user: UserDto::from(user.as_ref()),
            id: ticket.id,
            user_id: ticket.user_id,
            image_url: ticket.image_url,
            shop_name: ticket.shop_name,
            shop_addr: ticket.shop_addr,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            reason: ticket.reason,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TicketListDto {
    pub tickets: Vec<TicketDto>,
    pub total: u64,
}

impl TicketListDto {
    pub fn new(tickets: Vec<EnrichedTicket>, total: u64) -> Self {
        Self {
            tickets: tickets.into_iter().map(TicketDto::from).collect(),
            total,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MeasureDto {
    pub amount: f32,
    pub unit: String,
}

#[derive(Serialize, ToSchema)]
pub struct ImageInfoDto {
    pub product: String,
    pub description: String,
    pub price: f32,
    pub measure: Option<MeasureDto>,
    pub attributes: HashMap<String, String>,
}

impl From<ImageInfo> for ImageInfoDto {
    fn from(info: ImageInfo) -> Self {
        Self {
            product: info.product,
            description: info.description,
            price: info.price,
            measure: info.measure.map(|Measure { amount, unit }| MeasureDto { amount, unit }),
            attributes: info.attributes,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SuggestionDto {
    pub title: String,
    pub subtitle: String,
    pub distance: f32,
}

impl From<Suggestion> for SuggestionDto {
    fn from(s: Suggestion) -> Self {
        Self {
            title: s.title,
            subtitle: s.subtitle,
            distance: s.distance,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SummaryRecordDto {
    pub key: String,
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryDto {
    pub records: Vec<SummaryRecordDto>,
}

impl From<SummaryMap> for SummaryDto {
    fn from(summary: SummaryMap) -> Self {
        Self {
            records: summary
                .into_iter()
                .map(|(key, count)| SummaryRecordDto { key, count })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_must_be_eleven_digits() {
        assert!(validate_phone("79990001122").is_ok());
        assert!(validate_phone("+7999000112").is_err());
        assert!(validate_phone("7999000112").is_err());
        assert!(validate_phone("799900011223").is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(require("shopName", "Corner").is_ok());
        let err = require("shopName", "  ").unwrap_err();
        assert_eq!(err.0.message(), "shopName is required");
    }

    #[test]
    fn tokens_serialize_in_camel_case() {
        let dto = TokensDto::from(Tokens {
            access: "a".to_string(),
            refresh: "r".to_string(),
        });

        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json, serde_json::json!({"accessToken": "a", "refreshToken": "r"}));
    }
}
