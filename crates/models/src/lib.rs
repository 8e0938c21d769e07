//! Record types stored in the document store and the rules for building
//! them from request bodies.

pub mod errors;
pub mod entity;
pub mod validation;
pub mod business;
pub mod review;

pub use entity::{Entity, EntityKind, Key};
