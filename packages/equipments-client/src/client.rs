//! Thin wrapper over the hosted `/rest/v1/<table>` endpoints.

use std::fmt::Display;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Query string builder for table endpoints.
///
/// Parameters are sent in insertion order.
///
/// # Example
/// ```
/// use equipments_client::Query;
///
/// let query = Query::new().select("id,name").eq("id", 42).order("display_order");
/// assert_eq!(query.pairs()[1], ("id".to_string(), "eq.42".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column selection, e.g. `*` or `id,name,category`.
    pub fn select(mut self, columns: &str) -> Self {
        self.pairs.push(("select".to_string(), columns.to_string()));
        self
    }

    /// Equality filter (`column=eq.value`).
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.pairs.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Ascending sort on `column`.
    pub fn order(mut self, column: &str) -> Self {
        self.pairs.push(("order".to_string(), column.to_string()));
        self
    }

    pub fn limit(mut self, rows: usize) -> Self {
        self.pairs.push(("limit".to_string(), rows.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Authenticated REST client.
///
/// Every request carries `apikey`, `Authorization: Bearer`, a JSON content type and
/// `Prefer: return=representation`.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RestClient {
    /// Creates a client with the static headers baked in.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Reads rows; expects `200 OK`.
    pub async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, ClientError> {
        let body = self
            .send(
                Method::GET,
                table,
                query,
                None::<&()>,
                self.config.request_timeout,
                StatusCode::OK,
            )
            .await?;
        parse_rows(&body)
    }

    /// Inserts one record or a batch; expects `201 Created` and returns the inserted rows.
    pub async fn insert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        records: &T,
        timeout: Duration,
    ) -> Result<Vec<Value>, ClientError> {
        let body = self
            .send(
                Method::POST,
                table,
                &Query::new(),
                Some(records),
                timeout,
                StatusCode::CREATED,
            )
            .await?;
        parse_rows(&body)
    }

    /// Patches the rows matching `query`; expects `200 OK` and returns the updated rows.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &Query,
        changes: &T,
    ) -> Result<Vec<Value>, ClientError> {
        let body = self
            .send(
                Method::PATCH,
                table,
                query,
                Some(changes),
                self.config.request_timeout,
                StatusCode::OK,
            )
            .await?;
        parse_rows(&body)
    }

    /// Deletes the rows matching `query`; expects `204 No Content`.
    pub async fn delete(&self, table: &str, query: &Query) -> Result<(), ClientError> {
        self.send(
            Method::DELETE,
            table,
            query,
            None::<&()>,
            self.config.request_timeout,
            StatusCode::NO_CONTENT,
        )
        .await
        .map(|_| ())
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        table: &str,
        query: &Query,
        body: Option<&T>,
        timeout: Duration,
        expected: StatusCode,
    ) -> Result<String, ClientError> {
        let url = self.config.table_url(table);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .query(query.pairs())
            .timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
            ClientError::Transport(e)
        })?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(%method, %url, status = status.as_u16(), "response received");

        if status != expected {
            tracing::warn!(
                %method,
                %url,
                status = status.as_u16(),
                expected = expected.as_u16(),
                "unexpected status"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::Build(format!("header value: {}", e)))
}

/// Parses a JSON array of rows. An empty body is an empty row list.
fn parse_rows(body: &str) -> Result<Vec<Value>, ClientError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| ClientError::Decode(format!("{}: {}", e, body)))
}
