//! Query string parsing and row filtering.

use std::cmp::Ordering;

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use crate::router::RouterError;

/// Parsed `select`, `order`, `limit` and `column=eq.value` parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    /// Projected columns; `None` means all
    pub select: Option<Vec<String>>,
    /// Equality filters as (column, value)
    pub filters: Vec<(String, String)>,
    pub order: Option<String>,
    pub limit: Option<usize>,
}

impl TableQuery {
    /// Parses a raw query string.
    pub fn parse(query_str: Option<&str>) -> Result<Self, RouterError> {
        let mut query = TableQuery::default();

        let Some(query_str) = query_str else {
            return Ok(query);
        };

        for pair in query_str.split('&').filter(|p| !p.is_empty()) {
            let Some((key, encoded_value)) = pair.split_once('=') else {
                continue;
            };
            let raw = encoded_value.replace('+', " ");
            let value = percent_decode_str(&raw).decode_utf8_lossy().into_owned();

            match key {
                "select" => {
                    if value != "*" {
                        query.select =
                            Some(value.split(',').map(|c| c.trim().to_string()).collect());
                    }
                }
                "order" => {
                    // Only ascending order is supported; drop an explicit `.asc`.
                    query.order = Some(value.trim_end_matches(".asc").to_string());
                }
                "limit" => {
                    query.limit = Some(value.parse().map_err(|e| {
                        RouterError::BadRequest(format!("Invalid limit value '{}': {}", value, e))
                    })?);
                }
                column => match value.strip_prefix("eq.") {
                    Some(expected) => query
                        .filters
                        .push((column.to_string(), expected.to_string())),
                    None => {
                        return Err(RouterError::BadRequest(format!(
                            "failed to parse filter ({}={})",
                            column, value
                        )))
                    }
                },
            }
        }

        Ok(query)
    }

    /// Whether `row` satisfies every equality filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters
            .iter()
            .all(|(column, expected)| match row.get(column) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Null) | None => expected == "null",
                Some(other) => other.to_string() == *expected,
            })
    }

    /// Filters, orders, limits and projects `rows`.
    pub fn apply(&self, rows: &[Value]) -> Vec<Value> {
        let mut selected: Vec<&Value> = rows.iter().filter(|row| self.matches(row)).collect();

        if let Some(column) = &self.order {
            selected.sort_by(|a, b| compare_values(a.get(column), b.get(column)));
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected.into_iter().map(|row| self.project(row)).collect()
    }

    fn project(&self, row: &Value) -> Value {
        match (&self.select, row) {
            (Some(columns), Value::Object(map)) => {
                let projected: Map<String, Value> = columns
                    .iter()
                    .filter_map(|c| map.get(c).map(|v| (c.clone(), v.clone())))
                    .collect();
                Value::Object(projected)
            }
            _ => row.clone(),
        }
    }
}

// Nulls sort last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Greater,
        (_, Some(Value::Null) | None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}
