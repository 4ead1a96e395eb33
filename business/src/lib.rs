//! Business layer of the email sender grid.
//!
//! Fetches senders from `/api/marketing/senders`, normalizes them into display
//! rows, filters them by free text and forwards edit/delete intents to the
//! host. Rendering is left to the embedding application.

pub mod config;
pub mod http;
pub mod senders;

pub use config::{
    ConfigError, ConnectionConfig, DeletePolicy, GridConfig, GridPolicy, LoadFailurePolicy,
};
pub use senders::*;
