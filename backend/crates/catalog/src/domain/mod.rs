//! Domain Layer
//!
//! Entities, value objects, the proximity ranking and repository traits.

pub mod entity;
pub mod geo;
pub mod repository;
pub mod value_object;
