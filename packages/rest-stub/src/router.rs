//! Matchit routing configuration.

use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;
use serde_json::Value;

use crate::handlers;
use crate::query::TableQuery;
use crate::store::{RecordedRequest, Store};

/// A routed table request with its body already read.
#[derive(Debug)]
pub struct TableRequest {
    pub method: Method,
    pub table: String,
    pub query: TableQuery,
    pub body: Option<Value>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    store: Arc<Store>,
}

impl Router {
    /// Creates a router serving the tables of `store`.
    pub fn new(store: Arc<Store>) -> Self {
        let mut router = MatchitRouter::new();
        // Only a literal path can fail to insert, and this one is valid.
        let _ = router.insert("/rest/v1/{table}", RouteHandler::Table);

        Self {
            inner: router,
            store,
        }
    }

    /// Routes an incoming request to the appropriate handler.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        let table = match self.inner.at(&path) {
            Ok(matched) => match matched.value {
                RouteHandler::Table => matched
                    .params
                    .get("table")
                    .unwrap_or_default()
                    .to_string(),
            },
            Err(_) => return Err(RouterError::NotFound(format!("No route found for {}", path))),
        };

        self.authorize(&req)?;

        let (parts, body) = req.into_parts();
        let raw_query = parts.uri.query().unwrap_or_default().to_string();
        let body_bytes = body
            .collect()
            .await
            .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?
            .to_bytes();
        let body = if body_bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice::<Value>(&body_bytes).map_err(|e| {
                RouterError::BadRequest(format!("Failed to parse request body: {}", e))
            })?)
        };

        self.store.record(RecordedRequest {
            method: parts.method.to_string(),
            table: table.clone(),
            query: raw_query.clone(),
            body: body.clone(),
        });
        tracing::debug!(method = %parts.method, %table, query = %raw_query, "stub request");

        if let Some(fault) = self.store.fault(&table, parts.method.as_str()) {
            return handlers::build_response(fault.status, fault.body.into_bytes());
        }

        let request = TableRequest {
            method: parts.method,
            table,
            query: TableQuery::parse(Some(&raw_query))?,
            body,
        };
        RouteHandler::Table.handle(request, &self.store)
    }

    fn authorize(&self, req: &Request<hyper::body::Incoming>) -> Result<(), RouterError> {
        let headers = req.headers();
        let api_key = headers.get("apikey").and_then(|v| v.to_str().ok());
        let bearer = headers
            .get(hyper::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let expected = Some(self.store.api_key());
        if api_key == expected && bearer == expected {
            Ok(())
        } else {
            Err(RouterError::Unauthorized)
        }
    }
}

/// Route handler function.
enum RouteHandler {
    Table,
}

impl RouteHandler {
    fn handle(&self, req: TableRequest, store: &Store) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::Table => match req.method {
                Method::GET => handlers::select_rows(req, store),
                Method::POST => handlers::insert_rows(req, store),
                Method::PATCH => handlers::update_rows(req, store),
                Method::DELETE => handlers::delete_rows(req, store),
                _ => Err(RouterError::MethodNotAllowed),
            },
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    Unauthorized,
    InternalError(String),
    BadRequest(String),
    NotFound(String),
    /// A row violated a check constraint
    CheckViolation { table: String, constraint: String },
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::Unauthorized => write!(f, "Invalid API key"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::CheckViolation { table, constraint } => write!(
                f,
                "new row for relation \"{}\" violates check constraint \"{}\"",
                table, constraint
            ),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let (status, code) = match &err {
            RouterError::MethodNotAllowed => (405, "PGRST105"),
            RouterError::Unauthorized => (401, "PGRST301"),
            RouterError::InternalError(_) => (500, "XX000"),
            RouterError::BadRequest(_) => (400, "PGRST100"),
            RouterError::NotFound(_) => (404, "PGRST205"),
            RouterError::CheckViolation { .. } => (400, "23514"),
        };

        let error_response = handlers::error_response(code, err.to_string());
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|_| err.to_string().into_bytes());

        handlers::build_response(status, body).unwrap_or_else(|_| {
            let mut fallback = Response::new(Bytes::from("Internal Server Error"));
            *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}
