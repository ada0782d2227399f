//! Test record creation and deletion.

use equipments_client::steps::{create_test_equipment, create_test_equipment_at, delete_equipment};
use equipments_client::RecordId;
use serde_json::json;

use super::helpers::{client_for, equipment_row, names, start_stub, start_stub_with_text_ids};

#[tokio::test]
async fn test_create_returns_assigned_id() {
    let server = start_stub().await;
    let client = client_for(&server);

    let created = create_test_equipment_at(&client, 1_755_459_109).await.unwrap();
    assert_eq!(created.id, Some(RecordId::Integer(1)));

    let rows = server.store().rows("equipments");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Test Equipment 1755459109");
    assert_eq!(rows[0]["display_order"], 999);
    assert_eq!(rows[0]["type"], "amenity");
    assert_eq!(rows[0]["is_active"], true);
}

#[tokio::test]
async fn test_created_names_differ_across_timestamps() {
    let server = start_stub().await;
    let client = client_for(&server);

    create_test_equipment_at(&client, 100).await.unwrap();
    create_test_equipment_at(&client, 101).await.unwrap();

    let created = names(&server.store().rows("equipments"));
    assert_eq!(created, vec!["Test Equipment 100", "Test Equipment 101"]);
}

#[tokio::test]
async fn test_create_uses_current_time() {
    let server = start_stub().await;
    let client = client_for(&server);

    let before = unix_now();
    let created = create_test_equipment(&client).await.unwrap();
    let after = unix_now();

    let name = created.rows[0]["name"].as_str().unwrap().to_string();
    let stamp: i64 = name.trim_start_matches("Test Equipment ").parse().unwrap();
    assert!(before <= stamp && stamp <= after);
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

#[tokio::test]
async fn test_create_rejected_by_row_level_security() {
    let server = start_stub().await;
    server.store().inject_fault(
        "equipments",
        "POST",
        401,
        r#"{"code":"42501","message":"new row violates Row-Level Security policy for table \"equipments\""}"#,
    );
    let client = client_for(&server);

    let err = create_test_equipment_at(&client, 1).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.is_policy_rejection(&client.config().policy_rejection_marker));
    assert!(server.store().rows("equipments").is_empty());
}

#[tokio::test]
async fn test_create_then_delete_id_42() {
    let server = start_stub().await;
    server
        .store()
        .seed_rows("equipments", vec![json!({"id": 41, "name": "Parking", "type": "facility"})]);
    let client = client_for(&server);

    let created = create_test_equipment_at(&client, 7).await.unwrap();
    assert_eq!(created.id, Some(RecordId::Integer(42)));

    assert!(delete_equipment(&client, &RecordId::from(42)).await);
    assert_eq!(names(&server.store().rows("equipments")), vec!["Parking"]);

    let deletes = server.store().requests_with_method("DELETE");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].query, "id=eq.42");
}

#[tokio::test]
async fn test_delete_missing_id_is_false() {
    let server = start_stub().await;
    server
        .store()
        .seed_rows("equipments", vec![equipment_row("Parking", 4, true)]);
    let client = client_for(&server);

    assert!(!delete_equipment(&client, &RecordId::from(9999)).await);
    assert_eq!(server.store().rows("equipments").len(), 1);
}

#[tokio::test]
async fn test_create_then_delete_with_uuid_key() {
    let server = start_stub_with_text_ids().await;
    let client = client_for(&server);

    let created = create_test_equipment_at(&client, 1_755_459_109).await.unwrap();
    let id = created.id.expect("uuid key should be extracted");
    assert_eq!(id, RecordId::from("00000000-0000-4000-8000-000000000001"));

    assert!(delete_equipment(&client, &id).await);
    assert!(server.store().rows("equipments").is_empty());

    let deletes = server.store().requests_with_method("DELETE");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].query, "id=eq.00000000-0000-4000-8000-000000000001");
}

#[tokio::test]
async fn test_create_reads_uuid_from_returned_row() {
    let server = start_stub().await;
    server.store().inject_fault(
        "equipments",
        "POST",
        201,
        r#"[{"id":"6f1c2a9e-5b7d-4c1e-9a0b-000000000001","name":"Test Equipment 5"}]"#,
    );
    let client = client_for(&server);

    let created = create_test_equipment_at(&client, 5).await.unwrap();
    assert_eq!(
        created.id,
        Some(RecordId::from("6f1c2a9e-5b7d-4c1e-9a0b-000000000001"))
    );
}
