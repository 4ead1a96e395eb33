use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("update channel closed: the receiving side was dropped")]
    ChannelClosed,
    #[error("signal hub dropped while subscription `{name}` was still active")]
    HubClosed { name: String },
}

impl Error {
    pub fn hub_closed(name: impl Into<String>) -> Self {
        Self::HubClosed { name: name.into() }
    }
}
