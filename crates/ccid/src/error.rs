//! Error types for CCID protocol operations

use thiserror::Error;

/// Result type for CCID operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for CCID protocol operations
#[derive(Debug, Error)]
pub enum Error {
    /// Response buffer is shorter than the fixed CCID header
    #[error("Response too short: {0} bytes (need at least 10)")]
    ResponseTooShort(usize),

    /// No card present, or the card did not answer the power-on
    #[error("No card detected")]
    NoCard,

    /// Card powered on but returned an empty ATR
    #[error("Card returned an empty ATR")]
    EmptyAtr,

    /// Failure in the underlying byte transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// Context with source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

impl Error {
    /// Create a transport error from any displayable failure
    pub fn transport<E: std::fmt::Display>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for Result with context addition
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_and_renders_source() {
        let err: Result<()> = Err(Error::transport("endpoint stalled"));
        let err = err.context("frame exchange").unwrap_err();
        assert_eq!(
            err.to_string(),
            "frame exchange: Transport error: endpoint stalled"
        );
        assert!(matches!(
            err,
            Error::Context { source, .. } if matches!(*source, Error::Transport(_))
        ));
    }
}
