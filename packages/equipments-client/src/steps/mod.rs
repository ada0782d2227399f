//! Individual smoke-test steps.
//!
//! Each step prints its own status lines and returns a `Result`; nothing is
//! retried and no error escapes as a panic.

pub mod create;
pub mod delete;
pub mod probe;
pub mod seed;

pub use create::{create_test_equipment, create_test_equipment_at, CreatedRecord};
pub use delete::delete_equipment;
pub use probe::{probe_table, TableAccess};
pub use seed::{seed_initial_equipments, SeedOutcome};

use crate::error::ClientError;

/// Prints the failure line for a step: the status and raw body when the server
/// answered, the transport error text otherwise.
pub(crate) fn print_failure(context: &str, err: &ClientError) {
    match err {
        ClientError::Status { status, body } => {
            println!("❌ Erreur {} {}: {}", context, status, body)
        }
        other => println!("❌ Erreur {}: {}", context, other),
    }
}
