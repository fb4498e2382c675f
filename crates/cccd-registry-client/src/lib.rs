//! # cccd-registry-client
//!
//! Async client for the thongtindoanhnghiep business-registry REST API.
//! It covers the administrative hierarchy (city, district, ward), the
//! industry list, and company search and lookup by tax code.
//!
//! The registry is independent of the identifier codec; it is used to
//! cross-reference the province names in the jurisdiction table against a
//! live data source.
//!
//! All requests retry transport errors and `429 Too Many Requests` with
//! exponential backoff.

pub mod client;
pub mod config;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::{CompanyPager, RegistryClient, DEFAULT_PAGE_SIZE};
pub use config::{ConfigError, RegistryConfig};
pub use error::RegistryError;
pub use types::{extract_items, CompanyPage, CompanyQuery, RegistryItem};
