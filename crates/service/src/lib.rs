//! Service layer: the document store abstraction and the business/review
//! operations built on it.
//! - Stores are injected as `Arc<dyn DocumentStore>`; nothing here is global.
//! - Request-shape rules live in the `models` crate.

pub mod errors;
pub mod storage;
pub mod business_service;
pub mod review_service;
#[cfg(test)]
pub mod test_support;

pub use business_service::BusinessService;
pub use review_service::ReviewService;
pub use storage::{DocumentStore, Query};
