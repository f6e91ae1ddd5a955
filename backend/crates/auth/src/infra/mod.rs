//! Infrastructure Layer
//!
//! Database implementations.

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryAuthRepository;
pub use postgres::PgAuthRepository;
