//! HTTP object store backed by reqwest
//!
//! Objects are addressed path-style as `{endpoint}/{bucket}/{id}/{name}`,
//! which is how public S3-compatible buckets expose anonymous HTTP access.
//! A bearer token can be attached for stores that gate access.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{RemoteErrorKind, Result, StoreError};
use crate::locator::Locator;
use crate::store::{ObjectStore, Probe};

/// Default per-request timeout. Generous because fetches stream
/// multi-gigabyte bodies; this bounds stalls, not total transfer time.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`HttpStore`].
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base endpoint, e.g. `https://s3.amazonaws.com`.
    pub endpoint: String,
    /// Optional bearer token for access-controlled buckets.
    pub token: Option<String>,
    /// Connect timeout; `None` uses the default.
    pub connect_timeout: Option<Duration>,
}

impl HttpStoreConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: None,
            connect_timeout: None,
        }
    }
}

/// HTTP implementation of [`ObjectStore`].
#[derive(Debug)]
pub struct HttpStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpStore {
    /// Build a store client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` when the underlying client cannot be
    /// constructed (TLS backend, malformed endpoint).
    pub fn new(config: HttpStoreConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(StoreError::Config {
                detail: "endpoint must not be empty".into(),
            });
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
            .build()
            .map_err(|err| StoreError::Config {
                detail: format!("failed to build http client: {err}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            token: config.token,
        })
    }

    fn object_url(&self, locator: &Locator) -> String {
        format!("{}/{}", self.endpoint, locator.uri())
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn probe(&self, locator: &Locator) -> Result<Probe> {
        let url = self.object_url(locator);
        debug!(%locator, "probing remote object");

        let response = self
            .request(self.client.head(&url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            let size = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok());
            return Ok(Probe::Found { size });
        }

        match status {
            StatusCode::NOT_FOUND => Ok(Probe::NotFound {
                detail: format!("object not found (HTTP 404): {locator}"),
            }),
            StatusCode::FORBIDDEN => Ok(Probe::Forbidden {
                detail: format!("access denied (HTTP 403): {locator}"),
            }),
            other => Err(status_error(other, locator)),
        }
    }

    async fn fetch(&self, locator: &Locator, target: &Path) -> Result<()> {
        let url = self.object_url(locator);
        debug!(%locator, target = %target.display(), "fetching remote object");

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // Probe runs first, so a fetch-time 404/403 is unexpected and
            // classified like any other remote fault.
            return Err(status_error(status, locator));
        }

        let mut file = tokio::fs::File::create(target)
            .await
            .map_err(|err| StoreError::local(target, err))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport_error)?;
            file.write_all(&chunk)
                .await
                .map_err(|err| StoreError::local(target, err))?;
        }

        file.flush()
            .await
            .map_err(|err| StoreError::local(target, err))?;

        Ok(())
    }
}

/// Classify a transport-level reqwest failure.
fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::remote(RemoteErrorKind::Transport, err.to_string())
}

/// Classify an unexpected HTTP status.
fn status_error(status: StatusCode, locator: &Locator) -> StoreError {
    let kind = if status == StatusCode::TOO_MANY_REQUESTS {
        RemoteErrorKind::RateLimited
    } else if status.is_server_error() {
        RemoteErrorKind::Service
    } else {
        RemoteErrorKind::Other
    };
    StoreError::remote(kind, format!("unexpected HTTP status {status} for {locator}"))
}
