//! Shared fixtures.

use equipments_client::{ClientConfig, RestClient};
use rest_stub::{Store, StubServer};
use serde_json::{json, Value};

pub const API_KEY: &str = "test-anon-key";

/// Stub with empty `equipments` and `hotel_equipments` tables.
pub async fn start_stub() -> StubServer {
    start_stub_with(Store::with_equipment_tables(API_KEY)).await
}

/// Like [`start_stub`], but `equipments` is keyed by UUID-shaped text ids.
pub async fn start_stub_with_text_ids() -> StubServer {
    let store = Store::new(API_KEY);
    store.create_table_with_text_ids("equipments");
    store.create_table("hotel_equipments");
    store.add_check_constraint(
        "equipments",
        "equipments_type_check",
        "type",
        &["amenity", "technology", "facility"],
    );
    start_stub_with(store).await
}

pub async fn start_stub_with(store: Store) -> StubServer {
    StubServer::start(store)
        .await
        .expect("stub server should bind to an ephemeral port")
}

pub fn client_for(server: &StubServer) -> RestClient {
    RestClient::new(ClientConfig::new(server.base_url(), API_KEY)).expect("valid client config")
}

pub fn equipment_row(name: &str, display_order: i32, is_active: bool) -> Value {
    json!({
        "name": name,
        "type": "amenity",
        "category": "Confort",
        "description": "",
        "icon": "Star",
        "is_active": is_active,
        "display_order": display_order,
    })
}

pub fn names(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r["name"].as_str().map(str::to_string))
        .collect()
}
