//! Jumble backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds the marketplace
//! model, services, and ports; `inbound` adapts HTTP traffic onto the
//! driving ports; `outbound` provides the persistence adapters behind the
//! driven ports.

pub mod config;
pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by docs endpoints and tooling.
pub use doc::ApiDoc;
/// Trace middleware stamping every response with a `trace-id` header.
pub use middleware::Trace;
