//! Apartment booking backend.
//!
//! Hexagonal layout: [`domain`] holds the booking rules and ports,
//! [`inbound`] adapts HTTP onto the driving ports, and [`outbound`] provides
//! Postgres, in-memory and Argon2 adapters for the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
