//! Directory Client
//!
//! Lists the discovery catalog and fetches REST descriptions.
//!
//! The HTTP transport sits behind [`DiscoveryApi`] so the pagination and
//! selection rules in [`DirectoryClient`] can be exercised without a network.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::constants::discovery::MAX_CATALOG_PAGES;
use crate::types::{Result, ScribeError, ServiceDescriptor};

/// One page of the catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    #[serde(default)]
    pub items: Vec<ServiceDescriptor>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Discovery service transport
#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    /// Fetch one page of preferred catalog entries
    async fn list_page(&self, page_token: Option<&str>) -> Result<CatalogPage>;

    /// Fetch the full REST description of one service version
    async fn get_rest(&self, name: &str, version: &str) -> Result<Value>;
}

/// Shared discovery transport
pub type SharedDiscovery = Arc<dyn DiscoveryApi>;

// =============================================================================
// HTTP Transport
// =============================================================================

/// reqwest-backed discovery transport
pub struct HttpDiscovery {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url).map_err(|e| {
            ScribeError::Config(format!(
                "Invalid discovery base_url '{}': {}",
                config.base_url, e
            ))
        })?;

        let mut base_url = parsed.to_string();
        if base_url.ends_with('/') {
            base_url.pop();
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl DiscoveryApi for HttpDiscovery {
    async fn list_page(&self, page_token: Option<&str>) -> Result<CatalogPage> {
        let url = format!("{}/apis", self.base_url);
        let mut query = vec![("preferred", "true"), ("fields", "items,nextPageToken")];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        debug!("Requesting catalog page (token: {:?})", page_token);

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::Discovery(format!(
                "HTTP {} listing {}",
                status, url
            )));
        }

        Ok(response.json::<CatalogPage>().await?)
    }

    async fn get_rest(&self, name: &str, version: &str) -> Result<Value> {
        let url = format!("{}/apis/{}/{}/rest", self.base_url, name, version);
        debug!("Requesting description: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::Discovery(format!("HTTP {} from {}", status, url)));
        }

        Ok(response.json::<Value>().await?)
    }
}

// =============================================================================
// Directory Client
// =============================================================================

/// Catalog listing and service resolution over a [`DiscoveryApi`]
#[derive(Clone)]
pub struct DirectoryClient {
    api: SharedDiscovery,
}

impl DirectoryClient {
    pub fn new(api: SharedDiscovery) -> Self {
        Self { api }
    }

    /// Create a client backed by the HTTP transport
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpDiscovery::new(config)?)))
    }

    /// List the complete catalog, sorted case-insensitively by title
    ///
    /// Follows continuation tokens until none is returned. Any failing page, an
    /// empty result, or a pagination loop yields `CatalogUnavailable`; there is
    /// no partial delivery and no retry.
    pub async fn list_services(&self) -> Result<Vec<ServiceDescriptor>> {
        let mut services = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;

        for page_number in 1..=MAX_CATALOG_PAGES {
            let page = self
                .api
                .list_page(page_token.as_deref())
                .await
                .map_err(|e| {
                    warn!("Error fetching API list: {}", e);
                    ScribeError::catalog_unavailable(e.to_string())
                })?;

            debug!("Catalog page {}: {} items", page_number, page.items.len());
            services.extend(page.items);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                None => return Self::finish_listing(services),
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(ScribeError::catalog_unavailable(format!(
                            "continuation token repeated: {}",
                            token
                        )));
                    }
                    page_token = Some(token);
                }
            }
        }

        Err(ScribeError::catalog_unavailable(format!(
            "catalog exceeded {} pages",
            MAX_CATALOG_PAGES
        )))
    }

    fn finish_listing(mut services: Vec<ServiceDescriptor>) -> Result<Vec<ServiceDescriptor>> {
        if services.is_empty() {
            warn!("No APIs found in response");
            return Err(ScribeError::catalog_unavailable("catalog is empty"));
        }

        services.sort_by_cached_key(ServiceDescriptor::sort_key);
        info!("Fetched {} catalog entries", services.len());
        Ok(services)
    }

    /// Find a service by name in a freshly fetched catalog
    pub fn resolve<'a>(
        catalog: &'a [ServiceDescriptor],
        name: &str,
    ) -> Result<&'a ServiceDescriptor> {
        catalog
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ScribeError::ServiceNotFound {
                name: name.to_string(),
            })
    }

    /// Fetch the REST description of a catalog entry
    pub async fn fetch_description(&self, service: &ServiceDescriptor) -> Result<Value> {
        info!(
            "Fetching description for {} {}",
            service.name, service.version
        );

        self.api
            .get_rest(&service.name, &service.version)
            .await
            .map_err(|e| ScribeError::DiscoveryFetch {
                name: service.name.clone(),
                version: service.version.clone(),
                reason: e.to_string(),
            })
    }
}
