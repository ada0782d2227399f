//! Table storage, constraints, injected faults and the request log.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

/// Canned failure returned instead of handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub status: u16,
    pub body: String,
    /// Matching requests served normally before the fault kicks in
    pub after: usize,
}

/// A request as the server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub table: String,
    /// Raw (still encoded) query string
    pub query: String,
    /// Parsed JSON body, if any
    pub body: Option<Value>,
}

/// Allowed values for one column.
#[derive(Debug, Clone)]
pub(crate) struct CheckConstraint {
    pub name: String,
    pub column: String,
    pub allowed: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct TableData {
    pub rows: Vec<Value>,
    pub next_id: i64,
    /// Assign UUID-shaped text keys instead of integers
    pub text_ids: bool,
    pub constraints: Vec<CheckConstraint>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub tables: HashMap<String, TableData>,
    pub faults: HashMap<(String, String), Fault>,
    pub requests: Vec<RecordedRequest>,
}

/// Shared state behind the stub server.
#[derive(Debug)]
pub struct Store {
    api_key: String,
    state: Mutex<StoreState>,
}

impl Store {
    /// Creates an empty store accepting `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Creates the `equipments` and `hotel_equipments` tables, with the type
    /// check constraint on `equipments`.
    pub fn with_equipment_tables(api_key: impl Into<String>) -> Self {
        let store = Self::new(api_key);
        store.create_table("equipments");
        store.create_table("hotel_equipments");
        store.add_check_constraint(
            "equipments",
            "equipments_type_check",
            "type",
            &["amenity", "technology", "facility"],
        );
        store
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn create_table(&self, table: &str) {
        self.lock().tables.entry(table.to_string()).or_insert(TableData {
            next_id: 1,
            ..Default::default()
        });
    }

    /// Creates `table` with server-assigned UUID-shaped text keys.
    pub fn create_table_with_text_ids(&self, table: &str) {
        self.lock().tables.entry(table.to_string()).or_insert(TableData {
            next_id: 1,
            text_ids: true,
            ..Default::default()
        });
    }

    pub fn add_check_constraint(&self, table: &str, name: &str, column: &str, allowed: &[&str]) {
        if let Some(data) = self.lock().tables.get_mut(table) {
            data.constraints.push(CheckConstraint {
                name: name.to_string(),
                column: column.to_string(),
                allowed: allowed.iter().map(|v| v.to_string()).collect(),
            });
        }
    }

    /// Seeds rows directly, assigning ids to rows that lack one. Ids already
    /// present are kept as given.
    pub fn seed_rows(&self, table: &str, rows: Vec<Value>) {
        let mut state = self.lock();
        if let Some(data) = state.tables.get_mut(table) {
            for row in rows {
                data.push_row(row);
            }
        }
    }

    /// Current rows of `table`, in storage order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock()
            .tables
            .get(table)
            .map(|data| data.rows.clone())
            .unwrap_or_default()
    }

    /// Makes every `method` request on `table` fail with `status` and `body`.
    pub fn inject_fault(&self, table: &str, method: &str, status: u16, body: impl Into<String>) {
        self.inject_fault_after(table, method, 0, status, body);
    }

    /// Like [`Store::inject_fault`], but the first `after` matching requests succeed.
    pub fn inject_fault_after(
        &self,
        table: &str,
        method: &str,
        after: usize,
        status: u16,
        body: impl Into<String>,
    ) {
        self.lock().faults.insert(
            (table.to_string(), method.to_uppercase()),
            Fault {
                status,
                body: body.into(),
                after,
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests with the given method, in arrival order.
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method))
            .cloned()
            .collect()
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        self.lock().requests.push(request);
    }

    /// Fault for the request just recorded, if one applies.
    pub(crate) fn fault(&self, table: &str, method: &str) -> Option<Fault> {
        let state = self.lock();
        let fault = state
            .faults
            .get(&(table.to_string(), method.to_uppercase()))?;
        let seen = state
            .requests
            .iter()
            .filter(|r| r.table == table && r.method.eq_ignore_ascii_case(method))
            .count();
        (seen > fault.after).then(|| fault.clone())
    }

    // A panicking test thread must not take the whole server down with it.
    pub(crate) fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TableData {
    pub(crate) fn push_row(&mut self, mut row: Value) -> Value {
        if let Value::Object(map) = &mut row {
            match map.get("id") {
                Some(Value::Number(n)) => {
                    if let Some(id) = n.as_i64() {
                        self.next_id = self.next_id.max(id + 1);
                    }
                }
                Some(Value::Null) | None => {
                    let id = if self.text_ids {
                        Value::from(format!("00000000-0000-4000-8000-{:012x}", self.next_id))
                    } else {
                        Value::from(self.next_id)
                    };
                    map.insert("id".to_string(), id);
                    self.next_id += 1;
                }
                Some(_) => {}
            }
        }
        self.rows.push(row.clone());
        row
    }

    /// First constraint `row` violates.
    pub(crate) fn violated_constraint(&self, row: &Value) -> Option<&CheckConstraint> {
        self.constraints.iter().find(|c| match row.get(&c.column) {
            Some(Value::String(v)) => !c.allowed.iter().any(|a| a == v),
            Some(Value::Null) | None => false,
            Some(_) => true,
        })
    }
}
