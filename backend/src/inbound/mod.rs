//! Inbound adapters translating transport concerns into domain calls.

pub mod http;
pub mod ws;
