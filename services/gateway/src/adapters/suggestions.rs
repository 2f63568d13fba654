//! services/gateway/src/adapters/suggestions.rs

use async_trait::async_trait;
use gateway_core::{PortResult, Suggestion, SuggestionService};
use tonic::transport::Channel;

use crate::adapters::proto::shop_suggestions::{
    shop_suggestions_service_client::ShopSuggestionsServiceClient, SuggestionOptions,
};
use crate::adapters::status::unexpected;

/// Nearby-shop suggestions from the `shop_suggestions` backend.
#[derive(Clone)]
pub struct GrpcSuggestionAdapter {
    client: ShopSuggestionsServiceClient<Channel>,
}

impl GrpcSuggestionAdapter {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: ShopSuggestionsServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl SuggestionService for GrpcSuggestionAdapter {
    async fn suggestions(&self, lon: f32, lat: f32, count: u32) -> PortResult<Vec<Suggestion>> {
        let reply = self
            .client
            .clone()
            .get_suggestion(SuggestionOptions { lon, lat, count })
            .await
            .map_err(unexpected)?
            .into_inner();

        Ok(reply
            .suggestions
            .into_iter()
            .map(|s| Suggestion {
                title: s.title,
                subtitle: s.subtitle,
                distance: s.distance,
            })
            .collect())
    }
}
