use thiserror::Error as ThisError;

/// Failure taxonomy shared by every client in this crate.
///
/// `Validation` is raised before any I/O happens; the other three are
/// conversions of faults that occurred while talking to an upstream service.
/// Nothing in this crate panics on a failed call.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Bad caller input: empty city, malformed date, day count < 1,
    /// oversized notification title.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Network-level failure: DNS, connect, timeout.
    #[error("network failure: {0}")]
    Transport(String),

    /// The upstream service answered, but with a non-success status or a
    /// well-formed negative response.
    #[error("service error: {0}")]
    Upstream(String),

    /// A successful response whose body could not be decoded.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Wrap a `reqwest` send failure. Status-code failures are classified
    /// separately as `Upstream` by the caller; everything that never reached
    /// a response is transport.
    pub fn transport(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
