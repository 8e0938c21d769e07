//! Helpers shared by the server crate and the binary: tracing setup and
//! small response types.

pub mod types;
pub mod utils;
