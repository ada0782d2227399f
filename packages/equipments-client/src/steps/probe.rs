use serde_json::Value;

use crate::client::{Query, RestClient};
use crate::error::ClientError;

/// Rows returned by a one-row read of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableAccess {
    pub table: String,
    pub rows: Vec<Value>,
}

impl TableAccess {
    /// Number of rows returned (0 or 1).
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Checks that `table` is readable with the configured key.
pub async fn probe_table(client: &RestClient, table: &str) -> Result<TableAccess, ClientError> {
    println!("\n📊 Test d'accès à la table '{}'...", table);

    let query = Query::new().select("*").limit(1);
    match client.select(table, &query).await {
        Ok(rows) => {
            println!("✅ Accès OK: {} résultat(s)", rows.len());
            Ok(TableAccess {
                table: table.to_string(),
                rows,
            })
        }
        Err(e) => {
            super::print_failure("requête", &e);
            Err(e)
        }
    }
}
