//! # HTTP Client
//!
//! Typed request/response wrapper around the dealership API.
//!
//! This module provides [`HttpClient`], which:
//! - Resolves [`Operation`]s against the configured base URL
//! - Attaches the bearer credential to auth-required calls
//! - Normalizes every failure into a [`ServiceError`]
//!
//! No call is retried, and no timeout applies unless one is configured.
//! List endpoints are read to the last page through
//! [`fetch_all`](HttpClient::fetch_all).
//!
//! # Examples
//!
//! ```ignore
//! use dealer_reservation::infrastructure::remote::http_client::HttpClient;
//!
//! let client = HttpClient::new(&config, credentials)?;
//! let body: serde_json::Value = client.call(&Operation::ListAccessories, None::<&()>, false).await?;
//! ```

use crate::config::ClientConfig;
use crate::infrastructure::remote::credentials::{AccessToken, CredentialProvider};
use crate::infrastructure::remote::dto::{ErrorBodyDto, Listing};
use crate::infrastructure::remote::error::{ServiceError, ServiceResult};
use crate::infrastructure::remote::operation::Operation;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on pages read for one listing.
pub const MAX_PAGES: usize = 100;

/// HTTP client for the dealership API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// API root; always ends with `/`.
    base_url: Url,
    /// Read-only view of the session credential.
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the base URL is invalid or the
    /// client cannot be created.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ServiceResult<Self> {
        let base_url = config
            .base_url()
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Returns the API root.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the credential provider.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Performs one call and deserializes the JSON response.
    ///
    /// When `requires_auth` is true and no credential is present, fails with
    /// `ServiceError::Unauthenticated` without touching the network.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Unauthenticated` - missing or refused credential
    /// - `ServiceError::Transport` - no response was received
    /// - `ServiceError::RemoteRejected` - non-success status
    /// - `ServiceError::InvalidResponse` - the body could not be decoded
    pub async fn call<T, B>(
        &self,
        operation: &Operation,
        payload: Option<&B>,
        requires_auth: bool,
    ) -> ServiceResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.bearer(requires_auth)?;

        let mut url = self
            .base_url
            .join(&operation.path())
            .map_err(|e| ServiceError::transport(format!("invalid request URL: {e}")))?;
        let query = operation.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!(
            operation = operation.name(),
            mutating = operation.is_mutating(),
            %operation,
            "calling remote service"
        );
        self.execute(operation, url, payload, token).await
    }

    /// Reads every page of a list operation.
    ///
    /// Follows the `next` link of paginated answers until the last page. A
    /// bare array is a single page. Links must stay on the API origin so the
    /// credential is never sent elsewhere.
    ///
    /// # Errors
    ///
    /// - Any error of [`call`](Self::call), for any page
    /// - `ServiceError::InvalidResponse` if a link leaves the API origin or
    ///   the listing runs past [`MAX_PAGES`]
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        operation: &Operation,
    ) -> ServiceResult<Vec<T>> {
        let first: Listing<T> = self.fetch(operation).await?;
        let (mut items, mut next) = first.into_page();
        let mut pages = 1;

        while let Some(link) = next {
            if pages >= MAX_PAGES {
                warn!(operation = operation.name(), pages, "listing does not end");
                return Err(ServiceError::invalid_response(format!(
                    "listing exceeds {MAX_PAGES} pages"
                )));
            }
            let url = self.follow(&link)?;
            let token = self.bearer(operation.requires_auth())?;
            debug!(operation = operation.name(), page = pages + 1, "fetching next page");
            let page: Listing<T> = self.execute::<_, ()>(operation, url, None, token).await?;
            let (more, link) = page.into_page();
            items.extend(more);
            next = link;
            pages += 1;
        }
        Ok(items)
    }

    /// Returns the credential for an auth-required call.
    fn bearer(&self, requires_auth: bool) -> ServiceResult<Option<AccessToken>> {
        if !requires_auth {
            return Ok(None);
        }
        self.credentials
            .credential()
            .map(Some)
            .ok_or(ServiceError::Unauthenticated)
    }

    /// Resolves a pagination link against the API root.
    fn follow(&self, link: &str) -> ServiceResult<Url> {
        let url = self
            .base_url
            .join(link)
            .map_err(|e| ServiceError::invalid_response(format!("invalid next link: {e}")))?;
        if url.origin() != self.base_url.origin() {
            return Err(ServiceError::invalid_response(format!(
                "next link {url} leaves the API origin"
            )));
        }
        Ok(url)
    }

    async fn execute<T, B>(
        &self,
        operation: &Operation,
        url: Url,
        payload: Option<&B>,
        token: Option<AccessToken>,
    ) -> ServiceResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(operation.method(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        if let Some(body) = payload {
            request = request.json(body);
        }

        let response = request.send().await.map_err(Self::map_reqwest_error)?;
        Self::handle_response(operation, response).await
    }

    /// Calls an operation with no body, using its own auth requirement.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn fetch<T: DeserializeOwned>(&self, operation: &Operation) -> ServiceResult<T> {
        self.call::<T, ()>(operation, None, operation.requires_auth())
            .await
    }

    /// Calls an operation with a JSON body, using its own auth requirement.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub async fn send<T, B>(&self, operation: &Operation, body: &B) -> ServiceResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(operation, Some(body), operation.requires_auth())
            .await
    }

    /// Checks the status and deserializes the body.
    async fn handle_response<T: DeserializeOwned>(
        operation: &Operation,
        response: Response,
    ) -> ServiceResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.map_err(Self::map_reqwest_error)?;
            serde_json::from_slice::<T>(&bytes).map_err(|e| {
                warn!(operation = operation.name(), error = %e, "undecodable response");
                ServiceError::invalid_response(format!("failed to parse response: {e}"))
            })
        } else {
            let error_body = response.text().await.unwrap_or_default();
            let error = Self::map_status_error(status, &error_body);
            warn!(
                operation = operation.name(),
                status = status.as_u16(),
                error = %error,
                "remote service refused the call"
            );
            Err(error)
        }
    }

    /// Maps a reqwest error to a ServiceError.
    fn map_reqwest_error(error: reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            ServiceError::transport("request timed out")
        } else if error.is_connect() {
            ServiceError::transport(format!("connection failed: {error}"))
        } else if error.is_decode() {
            ServiceError::invalid_response(format!("failed to read response: {error}"))
        } else {
            ServiceError::transport(format!("HTTP request failed: {error}"))
        }
    }

    /// Maps a non-success status to a ServiceError.
    fn map_status_error(status: StatusCode, body: &str) -> ServiceError {
        match status {
            StatusCode::UNAUTHORIZED => ServiceError::Unauthenticated,
            _ => ServiceError::rejected_with(status.as_u16(), ErrorBodyDto::message_from(body)),
        }
    }
}
