use serde_json::Value;

use crate::client::RestClient;
use crate::error::ClientError;
use crate::model::{row_id, NewEquipment, RecordId, Table};

/// A test record accepted by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRecord {
    /// Identifier of the first returned row
    pub id: Option<RecordId>,
    pub rows: Vec<Value>,
}

/// Creates a test equipment named after the current Unix time.
pub async fn create_test_equipment(client: &RestClient) -> Result<CreatedRecord, ClientError> {
    create_test_equipment_at(client, chrono::Utc::now().timestamp()).await
}

/// Creates a test equipment whose name embeds `timestamp`.
pub async fn create_test_equipment_at(
    client: &RestClient,
    timestamp: i64,
) -> Result<CreatedRecord, ClientError> {
    println!("\n🆕 Création d'équipement test...");

    let record = NewEquipment::test_record(timestamp);
    let timeout = client.config().request_timeout;
    match client
        .insert(Table::Equipments.name(), &record, timeout)
        .await
    {
        Ok(rows) => {
            let id = rows.first().and_then(row_id);
            match id {
                Some(ref id) => println!("✅ Création réussie: ID {}", id),
                None => println!("✅ Création réussie: ID inconnu"),
            }
            Ok(CreatedRecord { id, rows })
        }
        Err(e) => {
            super::print_failure("création", &e);
            if e.is_policy_rejection(&client.config().policy_rejection_marker) {
                println!("🔍 Problème RLS détecté");
                tracing::warn!(record = %record.name, "insert rejected by row-level security");
            }
            Err(e)
        }
    }
}
