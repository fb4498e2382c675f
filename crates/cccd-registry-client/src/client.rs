//! Registry API client.
//!
//! List endpoints return the normalized item array; a 404 on a list is an
//! error. Detail endpoints return `Ok(None)` on 404.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::types::{extract_items, CompanyPage, CompanyQuery, RegistryItem};

/// Page size used when paging through every company match.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Client for the thongtindoanhnghiep REST API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Build a client from configuration.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RegistryError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Client against the configured environment, see [`RegistryConfig::from_env`].
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::new(RegistryConfig::from_env()?)
    }

    /// All provinces and municipalities.
    pub async fn cities(&self) -> Result<Vec<RegistryItem>, RegistryError> {
        self.list("/api/city", &[]).await
    }

    pub async fn city_detail(&self, city_id: i64) -> Result<Option<RegistryItem>, RegistryError> {
        self.detail(&format!("/api/city/{city_id}")).await
    }

    /// Districts of one city.
    pub async fn districts(&self, city_id: i64) -> Result<Vec<RegistryItem>, RegistryError> {
        self.list(&format!("/api/city/{city_id}/district"), &[]).await
    }

    pub async fn district_detail(
        &self,
        district_id: i64,
    ) -> Result<Option<RegistryItem>, RegistryError> {
        self.detail(&format!("/api/district/{district_id}")).await
    }

    /// Wards of one district.
    pub async fn wards(&self, district_id: i64) -> Result<Vec<RegistryItem>, RegistryError> {
        self.list(&format!("/api/district/{district_id}/ward"), &[])
            .await
    }

    pub async fn ward_detail(&self, ward_id: i64) -> Result<Option<RegistryItem>, RegistryError> {
        self.detail(&format!("/api/ward/{ward_id}")).await
    }

    /// Industry classification list.
    pub async fn industries(&self) -> Result<Vec<RegistryItem>, RegistryError> {
        self.list("/api/industry", &[]).await
    }

    /// One page of company search results.
    pub async fn search_companies(
        &self,
        query: &CompanyQuery,
    ) -> Result<CompanyPage, RegistryError> {
        let endpoint = "/api/company";
        let body = self.get_json(endpoint, &query.params()).await?;
        let total = body.get("Total").and_then(Value::as_u64);
        let items = decode_items(endpoint, body)?;
        Ok(CompanyPage {
            total: total.unwrap_or(items.len() as u64),
            items,
        })
    }

    /// Company by tax code (MST).
    ///
    /// Returns `Ok(None)` on 404, and when the body has no `Title`: the
    /// service answers unknown tax codes with an empty record.
    pub async fn company_by_tax_code(
        &self,
        tax_code: &str,
    ) -> Result<Option<RegistryItem>, RegistryError> {
        let item = self.detail(&format!("/api/company/{tax_code}")).await?;
        Ok(item.filter(|c| c.title.as_deref().is_some_and(|t| !t.is_empty())))
    }

    /// Pager over every company match, starting at `query.page` (or 1).
    pub fn company_pager(&self, query: CompanyQuery) -> CompanyPager<'_> {
        CompanyPager::new(self, query)
    }

    /// Collect every company match by paging until exhausted.
    pub async fn all_companies(
        &self,
        query: CompanyQuery,
    ) -> Result<Vec<RegistryItem>, RegistryError> {
        let mut pager = self.company_pager(query);
        let mut all = Vec::new();
        while let Some(page) = pager.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }

    async fn list(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<RegistryItem>, RegistryError> {
        let body = self.get_json(endpoint, params).await?;
        decode_items(endpoint, body)
    }

    async fn detail(&self, endpoint: &str) -> Result<Option<RegistryItem>, RegistryError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, "registry detail request");

        let resp = crate::retry::retry_send(|| self.http.get(&url).send())
            .await
            .map_err(|e| RegistryError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await.map_err(|e| RegistryError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RegistryError::Deserialization {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }

    async fn get_json(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, RegistryError> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, params = params.len(), "registry list request");

        let resp = crate::retry::retry_send(|| self.http.get(&url).query(params).send())
            .await
            .map_err(|e| RegistryError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json().await.map_err(|e| RegistryError::Http {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}

fn decode_items(endpoint: &str, body: Value) -> Result<Vec<RegistryItem>, RegistryError> {
    extract_items(body)
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| RegistryError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e,
        })
}

/// Walks company search pages.
///
/// Stops on an empty page or once the fetched count reaches the reported
/// total.
#[derive(Debug)]
pub struct CompanyPager<'a> {
    client: &'a RegistryClient,
    query: CompanyQuery,
    fetched: u64,
    done: bool,
}

impl<'a> CompanyPager<'a> {
    fn new(client: &'a RegistryClient, mut query: CompanyQuery) -> Self {
        query.per_page = Some(query.per_page.unwrap_or(DEFAULT_PAGE_SIZE));
        query.page = Some(query.page.unwrap_or(1).max(1));
        Self {
            client,
            query,
            fetched: 0,
            done: false,
        }
    }

    /// Items from the next page, or `None` once exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RegistryItem>>, RegistryError> {
        if self.done {
            return Ok(None);
        }
        let page = self.client.search_companies(&self.query).await?;
        if page.items.is_empty() {
            self.done = true;
            return Ok(None);
        }

        self.fetched += page.items.len() as u64;
        if self.fetched >= page.total {
            self.done = true;
        }
        tracing::debug!(
            page = self.query.page,
            fetched = self.fetched,
            total = page.total,
            "company page fetched"
        );
        self.query.page = self.query.page.map(|p| p + 1);
        Ok(Some(page.items))
    }

    /// Items fetched so far.
    pub fn fetched(&self) -> u64 {
        self.fetched
    }
}
