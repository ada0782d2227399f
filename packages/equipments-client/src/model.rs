//! Equipment records and the tables they live in.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remote tables touched by the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Equipment catalogue
    Equipments,
    /// Hotel <-> equipment association, probed read-only
    HotelEquipments,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Equipments => "equipments",
            Table::HotelEquipments => "hotel_equipments",
        }
    }
}

/// Equipment type tag, checked by a constraint on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    Amenity,
    Technology,
    Facility,
}

/// Insert payload for the `equipments` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEquipment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    pub category: String,
    pub description: String,
    /// UI icon name
    pub icon: String,
    pub is_active: bool,
    pub display_order: i32,
}

/// Display order given to test records so they sort last.
pub const TEST_DISPLAY_ORDER: i32 = 999;

impl NewEquipment {
    /// Throwaway record whose name embeds `timestamp`.
    pub fn test_record(timestamp: i64) -> Self {
        Self {
            name: format!("Test Equipment {}", timestamp),
            kind: EquipmentType::Amenity,
            category: "Test".to_string(),
            description: "Équipement de test automatisé".to_string(),
            icon: "Wrench".to_string(),
            is_active: true,
            display_order: TEST_DISPLAY_ORDER,
        }
    }

    /// The default catalogue inserted into an empty table, display orders 1 to 5.
    pub fn defaults() -> Vec<Self> {
        let seeds = [
            (
                "WiFi Gratuit",
                EquipmentType::Technology,
                "Connectivité",
                "Accès internet WiFi gratuit dans tout l'établissement",
                "Wifi",
            ),
            (
                "Télévision",
                EquipmentType::Amenity,
                "Divertissement",
                "Télévision dans les chambres",
                "Tv",
            ),
            (
                "Machine à café",
                EquipmentType::Amenity,
                "Boissons",
                "Machine à café/thé disponible",
                "Coffee",
            ),
            (
                "Parking",
                EquipmentType::Facility,
                "Stationnement",
                "Places de parking disponibles",
                "Car",
            ),
            (
                "Climatisation",
                EquipmentType::Amenity,
                "Confort",
                "Climatisation dans les chambres",
                "Wind",
            ),
        ];

        seeds
            .into_iter()
            .zip(1..)
            .map(|((name, kind, category, description, icon), order)| Self {
                name: name.to_string(),
                kind,
                category: category.to_string(),
                description: description.to_string(),
                icon: icon.to_string(),
                is_active: true,
                display_order: order,
            })
            .collect()
    }
}

/// Columns fetched when listing an already seeded table.
pub const SUMMARY_COLUMNS: &str = "id,name,category,is_active";

/// Server-assigned row identifier, kept opaque: an integer key or a text key
/// such as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Integer(i64),
    Text(String),
}

impl RecordId {
    /// Reads an identifier from a JSON value. Empty strings and non-scalar
    /// values carry no identifier.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_i64()
                    .map(RecordId::Integer)
                    .unwrap_or_else(|| RecordId::Text(n.to_string())),
            ),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Integer(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Integer(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// Listing view of an equipment row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquipmentSummary {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl EquipmentSummary {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }

    pub fn status_marker(&self) -> &'static str {
        if self.is_active.unwrap_or(false) {
            "✅"
        } else {
            "❌"
        }
    }
}

/// Identifier of a returned row, if it has a usable `id`.
pub fn row_id(row: &Value) -> Option<RecordId> {
    row.get("id").and_then(RecordId::from_value)
}

/// String column of a returned row, `N/A` when missing.
pub fn row_text<'a>(row: &'a Value, column: &str) -> &'a str {
    row.get(column).and_then(Value::as_str).unwrap_or("N/A")
}
