//! # Registry Cross-Reference
//!
//! City names served by the business registry line up with the names in
//! the jurisdiction table.

use cccd_core::JurisdictionTable;
use cccd_registry_client::{RegistryClient, RegistryConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn registry_city_names_resolve_in_jurisdiction_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/city"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "LtsItem": [
                {"ID": 1, "Title": "Hà Nội"},
                {"ID": 2, "Title": "Cần Thơ"},
                {"ID": 3, "Title": "An Giang"}
            ]
        })))
        .mount(&server)
        .await;

    let client = RegistryClient::new(RegistryConfig::with_base_url(&server.uri()).unwrap()).unwrap();
    let cities = client.cities().await.unwrap();
    let table = JurisdictionTable::global();

    let codes: Vec<&str> = cities
        .iter()
        .filter_map(|c| c.title.as_deref())
        .filter_map(|title| table.all().find(|j| j.name == title))
        .map(|j| j.code)
        .collect();
    assert_eq!(codes, vec!["001", "092", "089"]);
}
