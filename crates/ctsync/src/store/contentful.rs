//! Contentful Content Management API connector

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Proxy, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use super::ContentStore;
use super::spec::StoreSpec;
use crate::error::{Error, Result};
use crate::model::ContentType;

const MANAGEMENT_MEDIA_TYPE: &str = "application/vnd.contentful.management.v1+json";
const VERSION_HEADER: &str = "X-Contentful-Version";
const PAGE_LIMIT: usize = 1000;

/// Connection settings shared by every space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentfulSettings {
    /// Environment within each space
    pub environment: String,
    /// API host
    pub host: String,
    /// API port; the scheme default when unset
    pub port: Option<u16>,
    /// Use http instead of https
    pub insecure: bool,
    /// HTTP proxy as `(host, port)`
    pub proxy: Option<(String, u16)>,
    /// Per request timeout
    pub timeout: Duration,
}

impl Default for ContentfulSettings {
    fn default() -> Self {
        Self {
            environment: "master".to_string(),
            host: "api.contentful.com".to_string(),
            port: None,
            insecure: false,
            proxy: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ContentfulSettings {
    /// Base URL of the Management API, e.g. `https://api.contentful.com`
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.insecure { "http" } else { "https" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentTypeCollection {
    items: Vec<ContentType>,
    #[serde(default)]
    total: Option<usize>,
}

/// One Contentful space environment
pub struct ContentfulStore {
    spec: StoreSpec,
    base_url: String,
    environment: String,
    client: Client,
}

impl ContentfulStore {
    /// Creates a connector; no request is made until the first call
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the proxy or HTTP client is invalid.
    pub fn new(spec: StoreSpec, settings: &ContentfulSettings) -> Result<Self> {
        let mut builder = Client::builder().timeout(settings.timeout);

        if let Some((host, port)) = &settings.proxy {
            let proxy = Proxy::all(format!("http://{host}:{port}"))
                .map_err(|e| Error::Config(format!("invalid proxy {host}:{port}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            spec,
            base_url: settings.base_url(),
            environment: settings.environment.clone(),
            client,
        })
    }

    fn content_types_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}/content_types",
            self.base_url, self.spec.space_id, self.environment
        )
    }

    fn content_type_url(&self, id: &str) -> String {
        format!("{}/{id}", self.content_types_url())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.spec.access_token)
            .header(CONTENT_TYPE, MANAGEMENT_MEDIA_TYPE)
    }

    fn versioned(request: RequestBuilder, content_type: &ContentType) -> RequestBuilder {
        match content_type.version() {
            Some(version) => request.header(VERSION_HEADER, version),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| Error::Store {
            store: self.spec.name.clone(),
            message: format!("{action} failed: {e}"),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Remote {
            store: self.spec.name.clone(),
            status: status.as_u16(),
            message: format!("{action}: {body}"),
        })
    }

    async fn content_type_from(&self, response: Response, action: &str) -> Result<ContentType> {
        response.json().await.map_err(|e| Error::Store {
            store: self.spec.name.clone(),
            message: format!("failed to parse {action} response: {e}"),
        })
    }
}

#[async_trait]
impl ContentStore for ContentfulStore {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn content_types(&self) -> Result<Vec<ContentType>> {
        let url = self.content_types_url();
        debug!(store = %self.spec.name, %url, "fetching content types");

        let request = self
            .authorized(self.client.get(&url))
            .query(&[("limit", PAGE_LIMIT)]);
        let response = self.send(request, "listing content types").await?;

        let collection: ContentTypeCollection = response.json().await.map_err(|e| Error::Store {
            store: self.spec.name.clone(),
            message: format!("failed to parse content type list: {e}"),
        })?;

        if let Some(total) = collection.total
            && total > collection.items.len()
        {
            warn!(
                store = %self.spec.name,
                total,
                fetched = collection.items.len(),
                "store holds more content types than one page; only the first page is used"
            );
        }

        Ok(collection.items)
    }

    async fn save(&self, content_type: &ContentType) -> Result<ContentType> {
        let url = self.content_type_url(content_type.id());
        debug!(store = %self.spec.name, %url, version = ?content_type.version(), "saving content type");

        let body = content_type
            .update_body()
            .and_then(|body| serde_json::to_vec(&body))
            .map_err(|e| Error::Store {
                store: self.spec.name.clone(),
                message: format!("failed to encode content type {}: {e}", content_type.id()),
            })?;

        let request = Self::versioned(self.authorized(self.client.put(&url)), content_type).body(body);
        let response = self
            .send(request, &format!("saving content type {}", content_type.id()))
            .await?;
        self.content_type_from(response, "save").await
    }

    async fn publish(&self, content_type: &ContentType) -> Result<ContentType> {
        let url = format!("{}/published", self.content_type_url(content_type.id()));
        debug!(store = %self.spec.name, %url, version = ?content_type.version(), "publishing content type");

        let request = Self::versioned(self.authorized(self.client.put(&url)), content_type);
        let response = self
            .send(request, &format!("publishing content type {}", content_type.id()))
            .await?;
        self.content_type_from(response, "publish").await
    }
}
