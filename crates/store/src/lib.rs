//! Client-side state stores.
//!
//! Two independent stores: [`AuthStore`] for authentication identity and
//! [`UiStore`] for interface preferences. Both follow the same shape, a
//! cloneable handle over shared state that serializes a selected subset to a
//! JSON file on every transition and hydrates it back on open. Fields not in
//! the persisted subset (loading flags, the live notification list) never
//! touch disk.

mod auth;
mod error;
mod persist;
mod ui;

pub use auth::{AuthState, AuthStore};
pub use error::StoreError;
pub use ui::{Theme, UiNotification, UiState, UiStore};
