use thiserror::Error;

mod credentials;
mod time_window;

pub use credentials::*;
pub use time_window::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid auth token format: {reason}")]
    InvalidToken { reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Could not understand '{input}'")]
    InvalidTime { input: String },

    #[error("Invalid timezone: {input} - {reason}")]
    InvalidTimezone { input: String, reason: String },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}
