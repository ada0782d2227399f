//! Table endpoint handlers.

use hyper::{body::Bytes, Response};
use serde::Serialize;
use serde_json::Value;

use crate::router::{RouterError, TableRequest};
use crate::store::Store;

/// Error body in the shape the hosted API uses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

/// Helper to create error response
pub fn error_response(code: &str, message: String) -> ErrorResponse {
    ErrorResponse {
        code: code.to_string(),
        message,
        details: None,
        hint: None,
    }
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

fn rows_response(status: u16, rows: &[Value]) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(rows)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

fn missing_table(table: &str) -> RouterError {
    RouterError::NotFound(format!("Could not find the table 'public.{}'", table))
}

/// Reads rows.
///
/// # Endpoint
/// `GET /rest/v1/{table}?select=..&col=eq.v&order=col&limit=n`
///
/// # Response
/// - **200 OK**: JSON array of the matching rows
pub fn select_rows(req: TableRequest, store: &Store) -> Result<Response<Bytes>, RouterError> {
    let state = store.lock();
    let data = state
        .tables
        .get(&req.table)
        .ok_or_else(|| missing_table(&req.table))?;
    let rows = req.query.apply(&data.rows);
    rows_response(200, &rows)
}

/// Inserts one object or an array of objects.
///
/// # Endpoint
/// `POST /rest/v1/{table}`
///
/// # Response
/// - **201 Created**: JSON array of the inserted rows with assigned ids
///
/// # Errors
/// - **400 Bad Request**: body is not an object/array, or a check constraint fails;
///   nothing is inserted in that case
pub fn insert_rows(req: TableRequest, store: &Store) -> Result<Response<Bytes>, RouterError> {
    let records = match req.body {
        Some(Value::Array(items)) => items,
        Some(object @ Value::Object(_)) => vec![object],
        _ => {
            return Err(RouterError::BadRequest(
                "Expected a JSON object or array of objects".to_string(),
            ))
        }
    };

    let mut state = store.lock();
    let data = state
        .tables
        .get_mut(&req.table)
        .ok_or_else(|| missing_table(&req.table))?;

    if let Some(constraint) = records.iter().find_map(|r| data.violated_constraint(r)) {
        return Err(RouterError::CheckViolation {
            table: req.table.clone(),
            constraint: constraint.name.clone(),
        });
    }

    let inserted: Vec<Value> = records.into_iter().map(|r| data.push_row(r)).collect();
    rows_response(201, &inserted)
}

/// Merges the body into every matching row.
///
/// # Endpoint
/// `PATCH /rest/v1/{table}?col=eq.v`
///
/// # Response
/// - **200 OK**: JSON array of the updated rows (possibly empty)
pub fn update_rows(req: TableRequest, store: &Store) -> Result<Response<Bytes>, RouterError> {
    let Some(Value::Object(changes)) = req.body else {
        return Err(RouterError::BadRequest("Expected a JSON object".to_string()));
    };

    let mut state = store.lock();
    let data = state
        .tables
        .get_mut(&req.table)
        .ok_or_else(|| missing_table(&req.table))?;

    let mut updated = Vec::new();
    for row in data.rows.iter_mut().filter(|row| req.query.matches(row)) {
        if let Value::Object(map) = row {
            for (column, value) in &changes {
                map.insert(column.clone(), value.clone());
            }
        }
        updated.push(row.clone());
    }
    rows_response(200, &updated)
}

/// Deletes every matching row.
///
/// # Endpoint
/// `DELETE /rest/v1/{table}?col=eq.v`
///
/// # Response
/// - **204 No Content**: at least one row deleted
///
/// # Errors
/// - **400 Bad Request**: no filter given
/// - **404 Not Found**: no row matched
pub fn delete_rows(req: TableRequest, store: &Store) -> Result<Response<Bytes>, RouterError> {
    if req.query.filters.is_empty() {
        return Err(RouterError::BadRequest(
            "DELETE requires a filter".to_string(),
        ));
    }

    let mut state = store.lock();
    let data = state
        .tables
        .get_mut(&req.table)
        .ok_or_else(|| missing_table(&req.table))?;

    let before = data.rows.len();
    data.rows.retain(|row| !req.query.matches(row));
    if data.rows.len() == before {
        return Err(RouterError::NotFound(format!(
            "No row of '{}' matched the filter",
            req.table
        )));
    }
    build_empty_response(204)
}
