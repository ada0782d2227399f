//! In-memory stand-in for the hosted `/rest/v1/<table>` API.
//!
//! Serves select/filter/order/limit reads, single and batch inserts, updates and
//! deletes over plain HTTP on a local port. Tests can seed rows, declare check
//! constraints, inject failures per table and method, and inspect every request
//! the server received.

pub mod handlers;
pub mod query;
pub mod router;
pub mod server;
pub mod store;

pub use server::StubServer;
pub use store::{Fault, RecordedRequest, Store};
