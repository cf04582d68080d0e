//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **login**: credential digest handling over the user repository
//! - **speech**: pronunciation adapter (logging stand-in)
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod login;
pub mod persistence;
pub mod speech;
