//! Complete run: step order, aggregation and threshold verdicts.

use equipments_client::runner::{
    collect_results, run_complete_test, LABEL_CREATE, LABEL_DELETE, LABEL_EQUIPMENTS_ACCESS,
    LABEL_HOTEL_EQUIPMENTS_ACCESS, LABEL_SEED,
};
use equipments_client::{ClientConfig, RunReport, StepResult};
use pretty_assertions::assert_eq;

use super::helpers::{client_for, equipment_row, names, start_stub, start_stub_with_text_ids};

fn outcomes(report: &RunReport) -> Vec<(&str, bool)> {
    report
        .results
        .iter()
        .map(|r| (r.label.as_str(), r.passed))
        .collect()
}

#[tokio::test]
async fn test_empty_collection_is_seeded_and_fully_passes() {
    let server = start_stub().await;
    let client = client_for(&server);

    let report = collect_results(&client).await;

    assert_eq!(
        outcomes(&report),
        vec![
            (LABEL_EQUIPMENTS_ACCESS, true),
            (LABEL_HOTEL_EQUIPMENTS_ACCESS, true),
            (LABEL_CREATE, true),
            (LABEL_DELETE, true),
            (LABEL_SEED, true),
        ]
    );
    assert_eq!(report.success_rate(), 100);
    assert!(report.is_functional(80));

    // The test record is gone; only the defaults remain.
    assert_eq!(
        names(&server.store().rows("equipments")),
        vec![
            "WiFi Gratuit",
            "Télévision",
            "Machine à café",
            "Parking",
            "Climatisation"
        ]
    );
}

#[tokio::test]
async fn test_requests_follow_fixed_order() {
    let server = start_stub().await;
    let client = client_for(&server);

    collect_results(&client).await;

    let sequence: Vec<(String, String)> = server
        .store()
        .requests()
        .into_iter()
        .map(|r| (r.method, r.table))
        .collect();
    let expected = [
        ("GET", "equipments"),
        ("GET", "hotel_equipments"),
        ("POST", "equipments"),
        ("DELETE", "equipments"),
        ("GET", "equipments"),
        ("POST", "equipments"),
    ];
    assert_eq!(
        sequence,
        expected
            .iter()
            .map(|(m, t)| (m.to_string(), t.to_string()))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_existing_rows_are_listed_not_reinserted() {
    let server = start_stub().await;
    server
        .store()
        .seed_rows("equipments", vec![equipment_row("Piscine", 1, true)]);
    let client = client_for(&server);

    let report = collect_results(&client).await;

    assert_eq!(report.passed(), 5);
    // Only the test record insert.
    assert_eq!(server.store().requests_with_method("POST").len(), 1);
    assert_eq!(names(&server.store().rows("equipments")), vec!["Piscine"]);
}

#[tokio::test]
async fn test_forbidden_association_table_still_functional() {
    let server = start_stub().await;
    server.store().inject_fault(
        "hotel_equipments",
        "GET",
        403,
        r#"{"message":"permission denied for table hotel_equipments"}"#,
    );
    let client = client_for(&server);

    let report = collect_results(&client).await;

    assert_eq!(report.results[1], StepResult::new(LABEL_HOTEL_EQUIPMENTS_ACCESS, false));
    assert_eq!((report.passed(), report.total()), (4, 5));
    assert_eq!(report.success_rate(), 80);
    assert!(report.is_functional(ClientConfig::default().success_threshold_percent));
    assert!(run_complete_test(&client).await);
}

#[tokio::test]
async fn test_rejected_writes_fail_the_run() {
    let server = start_stub().await;
    server.store().inject_fault(
        "equipments",
        "POST",
        403,
        r#"{"message":"new row violates row-level security policy for table \"equipments\""}"#,
    );
    let client = client_for(&server);

    let report = collect_results(&client).await;

    assert_eq!(
        outcomes(&report),
        vec![
            (LABEL_EQUIPMENTS_ACCESS, true),
            (LABEL_HOTEL_EQUIPMENTS_ACCESS, true),
            (LABEL_CREATE, false),
            (LABEL_DELETE, false),
            (LABEL_SEED, false),
        ]
    );
    assert_eq!(report.success_rate(), 40);
    // Deletion is never attempted without an identifier.
    assert!(server.store().requests_with_method("DELETE").is_empty());
    assert!(!run_complete_test(&client).await);
}

#[tokio::test]
async fn test_failed_delete_counts_once() {
    let server = start_stub().await;
    server
        .store()
        .inject_fault("equipments", "DELETE", 409, r#"{"message":"conflict"}"#);
    let client = client_for(&server);

    let report = collect_results(&client).await;

    assert_eq!(report.results[3], StepResult::new(LABEL_DELETE, false));
    assert_eq!(report.success_rate(), 80);
}

#[tokio::test]
async fn test_uuid_keyed_collection_fully_passes() {
    let server = start_stub_with_text_ids().await;
    let client = client_for(&server);

    let report = collect_results(&client).await;

    assert_eq!(report.passed(), 5);
    assert_eq!(report.success_rate(), 100);
    assert_eq!(server.store().rows("equipments").len(), 5);

    let deletes = server.store().requests_with_method("DELETE");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].query, "id=eq.00000000-0000-4000-8000-000000000001");
}
