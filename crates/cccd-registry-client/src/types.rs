//! Response shapes.
//!
//! List endpoints are inconsistent: some wrap items in `LtsItem`, some in
//! `LtsItems`, and some return a bare JSON array. [`extract_items`]
//! normalizes all three.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A city, district, ward, industry or company record.
///
/// Only the fields common to every record are typed; the rest are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryItem {
    #[serde(rename = "ID", default)]
    pub id: Option<i64>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "SolrID", default)]
    pub solr_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Item array from any of the three list shapes. Anything else is empty.
pub fn extract_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => ["LtsItem", "LtsItems"]
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(items)) if !items.is_empty() => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Company search filters. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyQuery {
    /// Free-text keyword (`k`).
    pub keyword: Option<String>,
    /// Location slug (`l`).
    pub location: Option<String>,
    /// Industry slug (`i`).
    pub industry: Option<String>,
    /// Page size (`r`).
    pub per_page: Option<u32>,
    /// 1-based page number (`p`).
    pub page: Option<u32>,
}

impl CompanyQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let strings = [
            ("k", &self.keyword),
            ("l", &self.location),
            ("i", &self.industry),
        ];
        for (name, value) in strings {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                params.push((name, v.to_string()));
            }
        }
        if let Some(r) = self.per_page.filter(|r| *r > 0) {
            params.push(("r", r.to_string()));
        }
        if let Some(p) = self.page.filter(|p| *p > 0) {
            params.push(("p", p.to_string()));
        }
        params
    }
}

/// One page of company search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyPage {
    /// Total matches reported by the server, or the page length when the
    /// server does not report one.
    pub total: u64,
    pub items: Vec<RegistryItem>,
}
