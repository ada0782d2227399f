//! Table access probe tests.

use equipments_client::steps::probe_table;
use equipments_client::{ClientConfig, ClientError, RestClient};

use super::helpers::{client_for, equipment_row, start_stub, API_KEY};

#[tokio::test]
async fn test_probe_empty_table() -> anyhow::Result<()> {
    let server = start_stub().await;
    let client = client_for(&server);

    let access = probe_table(&client, "equipments").await?;
    assert_eq!(access.table, "equipments");
    assert_eq!(access.count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_probe_is_limited_to_one_row() {
    let server = start_stub().await;
    server.store().seed_rows(
        "equipments",
        vec![
            equipment_row("Parking", 4, true),
            equipment_row("Climatisation", 5, true),
            equipment_row("Télévision", 2, false),
        ],
    );
    let client = client_for(&server);

    let access = probe_table(&client, "equipments").await.unwrap();
    assert_eq!(access.count(), 1);
    assert_eq!(access.rows[0]["name"], "Parking");

    let requests = server.store().requests_with_method("GET");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "select=*&limit=1");
}

#[tokio::test]
async fn test_probe_forbidden_table_keeps_body() {
    let server = start_stub().await;
    server.store().inject_fault(
        "hotel_equipments",
        "GET",
        403,
        r#"{"code":"42501","message":"permission denied for table hotel_equipments"}"#,
    );
    let client = client_for(&server);

    let err = probe_table(&client, "hotel_equipments").await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.detail().contains("permission denied"));
}

#[tokio::test]
async fn test_probe_unknown_table_fails() {
    let server = start_stub().await;
    let client = client_for(&server);

    let err = probe_table(&client, "rooms").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_probe_with_wrong_key_is_unauthorized() {
    let server = start_stub().await;
    let client = RestClient::new(ClientConfig::new(server.base_url(), "other-key")).unwrap();

    let err = probe_table(&client, "equipments").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    // Rejected before routing, so never logged.
    assert!(server.store().requests().is_empty());
}

#[tokio::test]
async fn test_probe_transport_failure_is_reported_not_raised() {
    // Nothing listens on port 1.
    let client = RestClient::new(ClientConfig::new("http://127.0.0.1:1", API_KEY)).unwrap();

    let err = probe_table(&client, "equipments").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.status(), None);
}
