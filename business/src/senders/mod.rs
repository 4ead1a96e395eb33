//! Email senders domain module.
//!
//! - `model`: raw records and normalized display rows
//! - `api`: HTTP calls against `/api/marketing/senders`
//! - `loader`: row state with latest-request-wins loading
//! - `filter`: free-text row narrowing
//! - `actions`: edit/delete forwarding to the host
//! - `grid`: the controller hosts embed

pub mod actions;
pub mod api;
pub mod error;
pub mod filter;
pub mod grid;
pub mod loader;
pub mod model;
pub mod notification;

pub use actions::{
    ActionCode, CallbackDispatcher, HttpDeleteDispatcher, SenderActionDispatcher,
    SenderActionParams, SenderActionRequest, SenderActionState, forward_action,
};
pub use error::{ActionDispatchError, LoadError};
pub use filter::{SenderQuery, filter_rows};
pub use grid::{SENDER_UPDATED, SenderGrid};
pub use loader::{LoadEvent, LoadFuture, SenderListState, SenderLoader};
pub use model::{
    ListSendersResponse, NOT_AVAILABLE, SenderId, SenderRecord, SenderRow, UNKNOWN,
};
pub use notification::{Notification, NotificationLevel};
