//! Marketplace router client
//!
//! Reads are public; every write is admin-gated by the backend.

use encore_core::EncoreResult;
use log::debug;

use super::{
    bearer_headers, handle_response_error, parse_json, transport_error, ApiClientConfig,
};
use crate::types::{MarketplaceItem, NewMarketplaceItem};

/// Client for the `/marketplace` router
pub struct MarketplaceApi {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl MarketplaceApi {
    pub(crate) fn with_client(client: reqwest::Client, config: ApiClientConfig) -> Self {
        Self { client, config }
    }

    /// Items for sale; sold items are excluded unless requested
    pub async fn list(&self, include_sold: bool) -> EncoreResult<Vec<MarketplaceItem>> {
        let response = self
            .client
            .get(self.config.endpoint("marketplace/"))
            .query(&[("include_sold", include_sold)])
            .send()
            .await
            .map_err(|e| transport_error(e, "list_items"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "list_items").await);
        }

        parse_json(response, "list_items").await
    }

    /// A single item by id
    pub async fn get(&self, item_id: i64) -> EncoreResult<MarketplaceItem> {
        let response = self
            .client
            .get(self.config.endpoint(&format!("marketplace/{}", item_id)))
            .send()
            .await
            .map_err(|e| transport_error(e, "get_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "get_item").await);
        }

        parse_json(response, "get_item").await
    }

    /// List a new item for sale
    pub async fn create(
        &self,
        token: &str,
        item: &NewMarketplaceItem,
    ) -> EncoreResult<MarketplaceItem> {
        let response = self
            .client
            .post(self.config.endpoint("marketplace/"))
            .headers(bearer_headers(token)?)
            .json(item)
            .send()
            .await
            .map_err(|e| transport_error(e, "create_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "create_item").await);
        }

        parse_json(response, "create_item").await
    }

    /// Replace an item's listing fields
    pub async fn update(
        &self,
        token: &str,
        item_id: i64,
        item: &NewMarketplaceItem,
    ) -> EncoreResult<MarketplaceItem> {
        let response = self
            .client
            .put(self.config.endpoint(&format!("marketplace/{}", item_id)))
            .headers(bearer_headers(token)?)
            .json(item)
            .send()
            .await
            .map_err(|e| transport_error(e, "update_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "update_item").await);
        }

        parse_json(response, "update_item").await
    }

    /// Mark an item as sold
    pub async fn mark_sold(&self, token: &str, item_id: i64) -> EncoreResult<MarketplaceItem> {
        debug!("Marking item {} as sold", item_id);

        let response = self
            .client
            .patch(
                self.config
                    .endpoint(&format!("marketplace/{}/mark-sold", item_id)),
            )
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "mark_sold"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "mark_sold").await);
        }

        parse_json(response, "mark_sold").await
    }

    /// Remove an item from the marketplace (204 on success)
    pub async fn delete(&self, token: &str, item_id: i64) -> EncoreResult<()> {
        let response = self
            .client
            .delete(self.config.endpoint(&format!("marketplace/{}", item_id)))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "delete_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "delete_item").await);
        }

        Ok(())
    }
}
