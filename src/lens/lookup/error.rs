//! Lookup errors

use super::types::ApiError;

/// Errors returned by [`super::LookupClient`]
///
/// Each variant names the stage that failed, so callers can decide whether a
/// retry makes sense.
#[derive(Debug)]
pub enum LookupError {
    /// A bulk lookup was requested with no IP addresses
    EmptyInput,
    /// Connecting, sending the request or reading the body failed
    Transport(ureq::Error),
    /// The response body did not match the expected JSON shape
    Decode(serde_json::Error),
    /// A single lookup got back a number of results other than one
    UnexpectedResultCount { expected: usize, actual: usize },
    /// The API answered with an error envelope
    Api(ApiError),
    /// A client was built from configuration that has no access key
    MissingAccessKey,
}

impl LookupError {
    /// Whether the failure happened before any response was decoded
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport(_))
    }

    /// Whether the response arrived but could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, LookupError::Decode(_))
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::EmptyInput => write!(f, "no ips to check"),
            LookupError::Transport(e) => write!(f, "transport error: {}", e),
            LookupError::Decode(e) => write!(f, "failed to decode response: {}", e),
            LookupError::UnexpectedResultCount { expected, actual } => write!(
                f,
                "check returned unexpected number of results: expected {}, got {}",
                expected, actual
            ),
            LookupError::Api(e) => write!(f, "ipstack api error: {}", e),
            LookupError::MissingAccessKey => write!(f, "no ipstack access key configured"),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Transport(e) => Some(e),
            LookupError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ureq::Error> for LookupError {
    fn from(err: ureq::Error) -> Self {
        LookupError::Transport(err)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err)
    }
}
