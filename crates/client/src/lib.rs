//! CampusCash backend client.
//!
//! This crate is a thin client: it talks only to the backend HTTP API and
//! holds no business rules. Balances, coupon issuance and reward inventory
//! are decided server-side; everything here maps typed calls onto endpoints
//! and normalizes failures into [`ApiError`].

mod error;
mod http;
mod token;

pub mod services;

pub use error::{ApiError, FALLBACK_MESSAGE};
pub use http::{DEFAULT_TIMEOUT, Http};
pub use token::TokenStore;
