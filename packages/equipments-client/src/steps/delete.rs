use crate::client::{Query, RestClient};
use crate::model::{RecordId, Table};

/// Deletes the equipment with `id`. True only on `204 No Content`.
pub async fn delete_equipment(client: &RestClient, id: &RecordId) -> bool {
    println!("🗑️ Suppression équipement ID {}...", id);

    let query = Query::new().eq("id", id);
    match client.delete(Table::Equipments.name(), &query).await {
        Ok(()) => {
            println!("✅ Suppression réussie");
            true
        }
        Err(e) => {
            super::print_failure("suppression", &e);
            false
        }
    }
}
