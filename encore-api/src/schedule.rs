//! Schedule router client
//!
//! Every endpoint is bearer-authenticated; the backend scopes items to
//! the token's user.

use encore_core::EncoreResult;
use log::debug;

use super::{
    bearer_headers, handle_response_error, parse_json, transport_error, ApiClientConfig,
};
use crate::types::{NewScheduleItem, ScheduleItem, StudentSummary};

/// Client for the `/schedule` router
pub struct ScheduleApi {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl ScheduleApi {
    pub(crate) fn with_client(client: reqwest::Client, config: ApiClientConfig) -> Self {
        Self { client, config }
    }

    /// The user's complete schedule, ordered by start time
    pub async fn list(&self, token: &str) -> EncoreResult<Vec<ScheduleItem>> {
        let response = self
            .client
            .get(self.config.endpoint("schedule/"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "list_schedule"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "list_schedule").await);
        }

        parse_json(response, "list_schedule").await
    }

    /// Events of the current week
    pub async fn week(&self, token: &str) -> EncoreResult<Vec<ScheduleItem>> {
        let response = self
            .client
            .get(self.config.endpoint("schedule/week"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "week_schedule"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "week_schedule").await);
        }

        parse_json(response, "week_schedule").await
    }

    /// The next upcoming events
    pub async fn upcoming(&self, token: &str) -> EncoreResult<Vec<ScheduleItem>> {
        let response = self
            .client
            .get(self.config.endpoint("schedule/upcoming"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "upcoming_schedule"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "upcoming_schedule").await);
        }

        parse_json(response, "upcoming_schedule").await
    }

    /// Add an event to the user's schedule
    pub async fn create(&self, token: &str, item: &NewScheduleItem) -> EncoreResult<ScheduleItem> {
        debug!("Creating schedule event '{}'", item.title);

        let response = self
            .client
            .post(self.config.endpoint("schedule/"))
            .headers(bearer_headers(token)?)
            .json(item)
            .send()
            .await
            .map_err(|e| transport_error(e, "create_schedule_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "create_schedule_item").await);
        }

        parse_json(response, "create_schedule_item").await
    }

    /// Replace an event's fields
    pub async fn update(
        &self,
        token: &str,
        item_id: i64,
        item: &NewScheduleItem,
    ) -> EncoreResult<ScheduleItem> {
        let response = self
            .client
            .put(self.config.endpoint(&format!("schedule/{}", item_id)))
            .headers(bearer_headers(token)?)
            .json(item)
            .send()
            .await
            .map_err(|e| transport_error(e, "update_schedule_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "update_schedule_item").await);
        }

        parse_json(response, "update_schedule_item").await
    }

    /// Remove an event from the schedule (204 on success)
    pub async fn delete(&self, token: &str, item_id: i64) -> EncoreResult<()> {
        let response = self
            .client
            .delete(self.config.endpoint(&format!("schedule/{}", item_id)))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "delete_schedule_item"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "delete_schedule_item").await);
        }

        Ok(())
    }

    /// The teacher's student roster; the backend rejects non-teachers
    pub async fn students(&self, token: &str) -> EncoreResult<Vec<StudentSummary>> {
        let response = self
            .client
            .get(self.config.endpoint("schedule/students"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "students"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "students").await);
        }

        parse_json(response, "students").await
    }
}
