//! Auth router client
//!
//! Login, registration, profile refresh and instrument association.

use encore_core::{EncoreError, EncoreResult, ErrorContext, NewUser, TokenResponse, UserProfile};
use log::{debug, info, warn};

use super::{
    bearer_headers, handle_response_error, parse_json, transport_error, ApiClientConfig,
};

/// Client for the `/auth` router
pub struct AuthApi {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl AuthApi {
    pub(crate) fn with_client(client: reqwest::Client, config: ApiClientConfig) -> Self {
        Self { client, config }
    }

    /// Submit credentials to the token endpoint.
    ///
    /// The backend's login form is OAuth2-shaped: the `username` field
    /// carries the email. A non-2xx response surfaces as an
    /// authentication error carrying the backend's `detail` message.
    pub async fn login(&self, email: &str, password: &str) -> EncoreResult<TokenResponse> {
        debug!("Submitting credentials for {}", email);

        let response = self
            .client
            .post(self.config.endpoint("auth/login"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(|e| transport_error(e, "login"))?;

        if !response.status().is_success() {
            let api_error = handle_response_error(response, "login").await;
            warn!("Login rejected for {}", email);
            return Err(match api_error {
                EncoreError::Api { message, .. } => EncoreError::Authentication {
                    message,
                    context: ErrorContext::new("auth_api")
                        .with_operation("login")
                        .with_suggestion("Check the email and password and try again"),
                },
                other => other,
            });
        }

        let token: TokenResponse = parse_json(response, "login").await?;
        info!("Obtained bearer token for {}", token.user.email);
        Ok(token)
    }

    /// Submit new-account fields to the registration endpoint
    pub async fn register(&self, new_user: &NewUser) -> EncoreResult<UserProfile> {
        debug!("Registering account for {}", new_user.email);

        let response = self
            .client
            .post(self.config.endpoint("auth/register"))
            .json(new_user)
            .send()
            .await
            .map_err(|e| transport_error(e, "register"))?;

        if !response.status().is_success() {
            let api_error = handle_response_error(response, "register").await;
            return Err(match api_error {
                EncoreError::Api { message, .. } => EncoreError::Registration {
                    message,
                    context: ErrorContext::new("auth_api").with_operation("register"),
                },
                other => other,
            });
        }

        parse_json(response, "register").await
    }

    /// Resolve the current user behind a bearer token.
    ///
    /// A non-2xx response means the token is expired or invalid; the
    /// caller decides what that implies for its session state.
    pub async fn me(&self, token: &str) -> EncoreResult<UserProfile> {
        let response = self
            .client
            .get(self.config.endpoint("auth/me"))
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "me"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "me").await);
        }

        parse_json(response, "me").await
    }

    /// Associate an instrument with the current user
    pub async fn add_instrument(&self, token: &str, instrument_id: i64) -> EncoreResult<()> {
        let response = self
            .client
            .post(
                self.config
                    .endpoint(&format!("auth/me/instruments/{}", instrument_id)),
            )
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "add_instrument"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "add_instrument").await);
        }

        debug!("Added instrument {} to current user", instrument_id);
        Ok(())
    }

    /// Remove an instrument association from the current user
    pub async fn remove_instrument(&self, token: &str, instrument_id: i64) -> EncoreResult<()> {
        let response = self
            .client
            .delete(
                self.config
                    .endpoint(&format!("auth/me/instruments/{}", instrument_id)),
            )
            .headers(bearer_headers(token)?)
            .send()
            .await
            .map_err(|e| transport_error(e, "remove_instrument"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, "remove_instrument").await);
        }

        debug!("Removed instrument {} from current user", instrument_id);
        Ok(())
    }
}
