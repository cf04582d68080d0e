//! Backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds the vocabulary,
//! study, and quiz logic together with the ports it depends on; `inbound`
//! exposes the REST and WebSocket surfaces; `outbound` implements the ports
//! against PostgreSQL and the credential store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
