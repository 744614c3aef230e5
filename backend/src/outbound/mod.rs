//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories on Diesel
//! - **memory**: in-process repositories for tests and database-less runs
//! - **credentials**: Argon2id password hashing
//!
//! Adapters translate between domain types and storage representations and
//! carry no booking rules.

pub mod credentials;
pub mod memory;
pub mod persistence;
