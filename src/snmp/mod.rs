mod client;
mod types;

pub use client::SnmpClient;
pub use types::{SnmpError, SnmpResult, SnmpValue};
