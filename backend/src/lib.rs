//! Food API library: recipes with ingredients and the accounts that manage
//! them, served over HTTP with bearer-token sessions.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::trace_id::TraceId;
pub use middleware::Trace;
