//! REST client for the Sprout API.
//!
//! Wraps the HTTP endpoints with [`reqwest`]: fixed base URL, JSON
//! `Content-Type`/`Accept` headers, one client-wide timeout, and bearer
//! authentication taken from the injected [`Session`]. A `401` from any
//! authenticated call clears the session.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use sprout_core::models::{
    CatalogResponse, CreateEntryRequest, CreateLotRequest, Credentials, Microgreen,
    RawLot, RawNotification, RemoteEntry, TokenResponse,
};
use sprout_core::types::DbId;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// HTTP client for one Sprout API deployment.
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
    session: Session,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::with_client(client, config.api_url.clone(), session))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, session: Session) -> Self {
        Self {
            client,
            api_url,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ---- auth ----

    /// `POST /user/register`.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<TokenResponse> {
        let response = self
            .client
            .post(self.url("/user/register"))
            .json(credentials)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `POST /user/login`.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<TokenResponse> {
        let response = self
            .client
            .post(self.url("/user/login"))
            .json(credentials)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- lots ----

    /// `GET /lots/`.
    pub async fn list_lots(&self) -> ClientResult<Vec<RawLot>> {
        self.get_json("/lots/").await
    }

    /// `POST /lots/`.
    pub async fn create_lot(&self, request: &CreateLotRequest) -> ClientResult<RawLot> {
        self.post_json("/lots/", request).await
    }

    /// `DELETE /lots/{id}`.
    pub async fn delete_lot(&self, id: DbId) -> ClientResult<()> {
        let path = format!("/lots/{id}");
        let response = self.send_authorized(self.client.delete(self.url(&path))).await?;
        Self::check_status(response).await
    }

    // ---- catalog ----

    /// `GET /microgreens`.
    pub async fn list_microgreens(&self) -> ClientResult<Vec<Microgreen>> {
        let catalog: CatalogResponse = self.get_json("/microgreens").await?;
        Ok(catalog.into_entries())
    }

    /// `GET /microgreens/{id}`.
    pub async fn get_microgreen(&self, id: DbId) -> ClientResult<Microgreen> {
        self.get_json(&format!("/microgreens/{id}")).await
    }

    // ---- journal ----

    /// `POST /lots/{id}/entry`.
    pub async fn create_entry(
        &self,
        lot_id: DbId,
        request: &CreateEntryRequest,
    ) -> ClientResult<RemoteEntry> {
        self.post_json(&format!("/lots/{lot_id}/entry"), request).await
    }

    /// `GET /lots/{id}/entries`.
    pub async fn list_entries(&self, lot_id: DbId) -> ClientResult<Vec<RemoteEntry>> {
        let entries: Option<Vec<RemoteEntry>> =
            self.get_json(&format!("/lots/{lot_id}/entries")).await?;
        Ok(entries.unwrap_or_default())
    }

    // ---- notifications ----

    /// `GET /notifications`.
    pub async fn list_notifications(&self) -> ClientResult<Vec<RawNotification>> {
        self.get_json("/notifications").await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        let response = self.send_authorized(self.client.get(self.url(path))).await?;
        Self::parse_response(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let response = self
            .send_authorized(self.client.post(self.url(path)).json(body))
            .await?;
        Self::parse_response(response).await
    }

    /// Attach the bearer token and send. A `401` clears the session and
    /// comes back as [`ClientError::Unauthenticated`].
    async fn send_authorized(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let token = self.session.require_token().await?;
        let response = request.bearer_auth(token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "Token rejected by server, clearing session");
            self.session.clear().await?;
            return Err(ClientError::Unauthenticated);
        }
        Ok(response)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClientError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> ClientResult<()> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
