//! Inbound adapters translating transport protocols into domain calls.

pub mod http;
