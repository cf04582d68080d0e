//! Inbound HTTP adapter: REST handlers, session plumbing, and error mapping.

pub mod auth;
mod error;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod word_sets;
pub mod words;

pub use error::ApiResult;
