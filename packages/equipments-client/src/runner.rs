//! Complete equipments check: probes, create/delete round, seeding.

use std::time::Instant;

use crate::client::RestClient;
use crate::model::Table;
use crate::report::{RunReport, StepResult};
use crate::steps::{create_test_equipment, delete_equipment, probe_table, seed_initial_equipments};

pub const LABEL_EQUIPMENTS_ACCESS: &str = "Accès equipments";
pub const LABEL_HOTEL_EQUIPMENTS_ACCESS: &str = "Accès hotel_equipments";
pub const LABEL_CREATE: &str = "Création équipement";
pub const LABEL_DELETE: &str = "Suppression équipement";
pub const LABEL_SEED: &str = "Équipements initiaux";

/// Runs every check in order and collects the results without printing the summary.
pub async fn collect_results(client: &RestClient) -> RunReport {
    let started = Instant::now();
    let mut results = Vec::with_capacity(5);

    let equipments = probe_table(client, Table::Equipments.name()).await;
    results.push(StepResult::new(LABEL_EQUIPMENTS_ACCESS, equipments.is_ok()));

    let hotel_equipments = probe_table(client, Table::HotelEquipments.name()).await;
    results.push(StepResult::new(
        LABEL_HOTEL_EQUIPMENTS_ACCESS,
        hotel_equipments.is_ok(),
    ));

    let created = create_test_equipment(client).await;
    results.push(StepResult::new(LABEL_CREATE, created.is_ok()));

    // Without an identifier there is nothing to delete: the step counts as failed.
    let deleted = match created.ok().and_then(|record| record.id) {
        Some(id) => delete_equipment(client, &id).await,
        None => false,
    };
    results.push(StepResult::new(LABEL_DELETE, deleted));

    let seeded = seed_initial_equipments(client).await;
    results.push(StepResult::new(LABEL_SEED, seeded.is_ok()));

    RunReport::new(results, started.elapsed())
}

/// Runs the complete check, prints the report and returns the threshold verdict.
pub async fn run_complete_test(client: &RestClient) -> bool {
    println!("🧪 TEST COMPLET SYSTÈME ÉQUIPEMENTS\n");

    let report = collect_results(client).await;
    let config = client.config();
    println!("{}", report.render(config));

    let functional = report.is_functional(config.success_threshold_percent);
    tracing::info!(
        passed = report.passed(),
        total = report.total(),
        rate = report.success_rate(),
        functional,
        "equipments check finished"
    );
    functional
}
