//! Concrete operations, one function per backend call the application makes.
//!
//! Reads bind a service call to its [`QueryKey`](crate::QueryKey); writes
//! declare the invalidation edges that hold the cache consistent. Keeping
//! the edges next to the operation is deliberate: this table *is* the
//! client's consistency model.

pub mod auth;
pub mod company;
pub mod marketplace;
pub mod notifications;
pub mod professor;
pub mod student;
