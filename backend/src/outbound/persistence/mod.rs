//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! The adapters are thin translators: Diesel row structs (`models.rs`) and
//! schema definitions (`schema.rs`) stay internal, every database error maps
//! to a domain repository error, and no business logic lives here.

mod diesel_error_mapping;
mod diesel_user_repository;
mod diesel_word_repository;
mod diesel_word_set_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use diesel_word_repository::DieselWordRepository;
pub use diesel_word_set_repository::DieselWordSetRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
