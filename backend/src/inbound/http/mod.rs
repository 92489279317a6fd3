//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod identity;
pub mod in_flight;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;

pub use error::ApiResult;
