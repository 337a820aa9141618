use std::fmt;

use shared::error::{ErrorKind, GraphqlError, RecordError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Url,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Url => f.write_str("url"),
        }
    }
}

/// Client-side precondition failure. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: &'static str,
}

impl ValidationError {
    pub fn empty_title() -> Self {
        Self {
            field: Field::Title,
            message: "title must not be empty",
        }
    }

    pub fn empty_url() -> Self {
        Self {
            field: Field::Url,
            message: "url must not be empty for links",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("{operation} rejected by server: {message}")]
    Server {
        operation: &'static str,
        message: String,
    },
    #[error("malformed data from server: {0}")]
    DataIntegrity(#[from] RecordError),
}

pub type MutationError = ClientError;
pub type QueryError = ClientError;

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Server { .. } => ErrorKind::Server,
            Self::DataIntegrity(_) => ErrorKind::DataIntegrity,
        }
    }

    pub fn server(operation: &'static str, errors: &[GraphqlError]) -> Self {
        let message = if errors.is_empty() {
            "response carried no data".to_string()
        } else {
            errors
                .iter()
                .map(|error| match error.code() {
                    Some(code) => format!("{} ({code})", error.message),
                    None => error.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ")
        };
        Self::Server { operation, message }
    }

    /// Generic copy shown by views when a load or save fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Transport(_) | Self::DataIntegrity(_) => {
                "We couldn't reach your collections. Please try again later.".to_string()
            }
            Self::Server { .. } => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Transport(format!("http status {status}: {err}")),
            None => Self::Transport(err.to_string()),
        }
    }
}
