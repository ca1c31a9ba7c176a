//! HTTP page source for the Bugsnag data access API.
//!
//! A thin wrapper around reqwest bound to one base origin. It handles
//! authentication and turns responses into [`RawPage`]s; following links is
//! the pagination layer's job.

use super::{PageSource, RawPage};
use crate::constants::{BUGSNAG_API_BASE_URL, ERROR_BODY_PREVIEW_LENGTH};
use crate::error::AppError;
use crate::types::{Credentials, ValidationError};
use reqwest::{header, Client, RequestBuilder, Response};
use serde_json::Value;
use url::{Origin, Url};

/// A reqwest client bound to a Bugsnag API origin.
#[derive(Clone, Debug)]
pub struct BugsnagHttpClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl BugsnagHttpClient {
    /// Creates a client for the public Bugsnag API.
    pub fn new(credentials: Credentials) -> Result<Self, AppError> {
        let base_url = Url::parse(BUGSNAG_API_BASE_URL).map_err(|e| ValidationError::InvalidUrl {
            url: BUGSNAG_API_BASE_URL.to_string(),
            reason: e.to_string(),
        })?;
        Self::with_base_url(base_url, credentials)
    }

    /// Creates a client for any base URL (self-hosted installs, tests).
    ///
    /// The base must be a bare origin: API paths are absolute, so a path
    /// prefix would be dropped on every join.
    pub fn with_base_url(base_url: Url, credentials: Credentials) -> Result<Self, AppError> {
        if base_url.path() != "/" {
            return Err(ValidationError::InvalidUrl {
                url: base_url.to_string(),
                reason: "the API base URL must not carry a path".to_string(),
            }
            .into());
        }
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Version",
            header::HeaderValue::from_static(crate::constants::BUGSNAG_API_VERSION),
        );
        headers
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path or absolute URI against the base URL.
    ///
    /// Credentials are attached to every request, so URIs that land on
    /// another origin are refused.
    pub fn resolve(&self, uri: &str) -> Result<Url, AppError> {
        let url = self.base_url.join(uri).map_err(|e| ValidationError::InvalidUrl {
            url: uri.to_string(),
            reason: e.to_string(),
        })?;

        if url.origin() != self.base_url.origin() {
            log::warn!("Refusing to follow {} outside {}", url, self.base_url);
            return Err(ValidationError::InvalidUrl {
                url: uri.to_string(),
                reason: format!(
                    "outside the API origin {}",
                    self.base_url.origin().ascii_serialization()
                ),
            }
            .into());
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => {
                request.header(header::AUTHORIZATION, format!("token {}", token.as_str()))
            }
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    /// Makes an authenticated GET request.
    pub async fn get(&self, uri: &str) -> Result<Response, AppError> {
        let url = self.resolve(uri)?;
        log::debug!("HTTP GET {}", url);
        let response = self.authorize(self.client.get(url)).send().await?;
        log::debug!("HTTP {} for {}", response.status(), uri);
        Ok(response)
    }
}

#[async_trait::async_trait]
impl PageSource for BugsnagHttpClient {
    async fn get_page(&self, uri: &str) -> Result<RawPage, AppError> {
        let response = self.get(uri).await?;
        parse_page_response(response).await
    }

    fn origin(&self) -> Option<Origin> {
        Some(self.base_url.origin())
    }
}

/// Checks the status, collects `Link` values and decodes the record array.
async fn parse_page_response(response: Response) -> Result<RawPage, AppError> {
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log::debug!("Error body from {}: {}", url, preview(&body));
        return Err(AppError::ServiceStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            url,
        });
    }

    let link_values = response
        .headers()
        .get_all(header::LINK)
        .iter()
        .filter_map(|value| match value.to_str() {
            Ok(text) => Some(text.to_string()),
            Err(_) => {
                log::warn!("Ignoring non-ASCII Link header from {}", url);
                None
            }
        })
        .collect();

    let body = response.text().await?;
    let records = match serde_json::from_str::<Value>(&body)? {
        Value::Array(records) => records,
        other => {
            return Err(AppError::MalformedResponse(format!(
                "expected a JSON array of records from {}, got: {}",
                url,
                preview(&other.to_string())
            )));
        }
    };

    Ok(RawPage {
        records,
        link_values,
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}
