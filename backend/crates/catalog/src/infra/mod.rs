//! Infrastructure Layer

pub mod overpass;
pub mod postgres;

#[cfg(any(test, feature = "testing"))]
pub mod memory;
