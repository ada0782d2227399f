use serde_json::Value;

use crate::client::{Query, RestClient};
use crate::error::ClientError;
use crate::model::{row_text, EquipmentSummary, NewEquipment, Table, SUMMARY_COLUMNS};

use super::probe::probe_table;

/// What seeding found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table already had rows; nothing was written
    Existing { count: usize },
    /// The default batch was inserted
    Created { count: usize },
}

impl SeedOutcome {
    pub fn existing(&self) -> bool {
        matches!(self, SeedOutcome::Existing { .. })
    }

    pub fn created(&self) -> bool {
        matches!(self, SeedOutcome::Created { .. })
    }

    pub fn count(&self) -> usize {
        match self {
            SeedOutcome::Existing { count } | SeedOutcome::Created { count } => *count,
        }
    }
}

/// Inserts the default equipments unless the table already holds a row.
///
/// Existence of any row is enough to skip the insert; names are not compared.
pub async fn seed_initial_equipments(client: &RestClient) -> Result<SeedOutcome, ClientError> {
    println!("\n🌱 Ajout des équipements initiaux...");

    let table = Table::Equipments.name();
    if let Ok(access) = probe_table(client, table).await {
        if access.count() > 0 {
            println!("ℹ️ Équipements déjà présents, récupération de la liste...");
            return list_existing(client).await;
        }
    }

    let defaults = NewEquipment::defaults();
    match client
        .insert(table, &defaults, client.config().seed_timeout)
        .await
    {
        Ok(rows) => {
            print_inserted(&rows);
            Ok(SeedOutcome::Created { count: rows.len() })
        }
        Err(e) => {
            super::print_failure("insertion", &e);
            Err(e)
        }
    }
}

async fn list_existing(client: &RestClient) -> Result<SeedOutcome, ClientError> {
    let query = Query::new()
        .select(SUMMARY_COLUMNS)
        .order("display_order");
    let rows = match client.select(Table::Equipments.name(), &query).await {
        Ok(rows) => rows,
        Err(e) => {
            super::print_failure("lecture", &e);
            return Err(e);
        }
    };

    let equipments: Vec<EquipmentSummary> = serde_json::from_value(Value::Array(rows))
        .map_err(|e| ClientError::Decode(e.to_string()))?;

    println!("📋 {} équipements trouvés:", equipments.len());
    for equipment in &equipments {
        println!(
            "   {} {} ({}) - ID: {}",
            equipment.status_marker(),
            equipment.display_name(),
            equipment.category.as_deref().unwrap_or("N/A"),
            equipment.id
        );
    }

    Ok(SeedOutcome::Existing {
        count: equipments.len(),
    })
}

fn print_inserted(rows: &[Value]) {
    println!("✅ {} équipements ajoutés:", rows.len());
    for (i, row) in rows.iter().enumerate() {
        println!(
            "   {}. {} ({})",
            i + 1,
            row_text(row, "name"),
            row_text(row, "category")
        );
    }
}
