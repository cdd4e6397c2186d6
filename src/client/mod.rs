//! Client layer for the CLI interface
//!
//! A typed HTTP client for the tracker API, a local cache mirroring the
//! streamer list, and pure filter/sort transforms over the cached list.
//! API handlers do NOT use this layer — they call services directly.

mod cache;
mod filters;
mod http;

pub use cache::StreamerCache;
pub use filters::{SortKey, StreamerFilter, sort_streamers};
pub use http::ApiClient;

use std::fmt;

use crate::errors::SubtrackError;

// ============ ClientError ============

/// Errors from the client layer
#[derive(Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, malformed response
    Transport(String),
    /// The server answered with an error status and message
    Server { status: u16, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Server { status, message } => write!(f, "HTTP {}: {}", status, message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ClientError> for SubtrackError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(msg) => SubtrackError::network(msg),
            ClientError::Server { status: 404, message } => SubtrackError::not_found(message),
            ClientError::Server { status: 400, message } => SubtrackError::validation(message),
            ClientError::Server { status, message } => {
                SubtrackError::network(format!("HTTP {}: {}", status, message))
            }
        }
    }
}
