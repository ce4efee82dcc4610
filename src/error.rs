//! Error type shared by the dynamic call path and the host bindings

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Arity or type mismatch while decoding call arguments
    #[error("{function}(): {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Only produced under `OverflowPolicy::Reject`
    #[error("integer overflow adding {a} and {b}")]
    Overflow { a: i32, b: i32 },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_argument(function: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            function,
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
