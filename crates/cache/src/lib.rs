//! Query/mutation layer.
//!
//! Every read goes through [`QueryClient::query`] under a stable
//! hierarchical [`QueryKey`]; every write goes through
//! [`QueryClient::mutate`], which on success invalidates the keys whose data
//! it affects so the next read refetches. The invalidation edges are
//! declared per operation in [`ops`] and are the only cross-entity
//! consistency the client enforces. This is also the single layer that turns
//! thrown errors into user-visible messages; nothing below it touches
//! presentation.

mod error;
mod key;
mod query;
mod retry;
mod route;

pub mod ops;

pub use error::OpError;
pub use key::{QueryKey, keys};
pub use query::QueryClient;
pub use retry::RetryPolicy;
pub use route::Route;
