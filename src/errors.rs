/// All error types that can occur when talking to a device or loading its
/// description.
///
/// The first four variants form the failure taxonomy of a device exchange and
/// are mutually exclusive: every failed request maps to exactly one of them and
/// leaves the cached device state untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No response arrived within the request timeout.
    #[error("device {address} did not answer in time")]
    Timeout { address: String },

    /// The device could not be reached (refused, unreachable, too many redirects, ...).
    #[error("unable to reach device {address}: {reason}")]
    Transport { address: String, reason: String },

    /// The device answered with a non-success status or an error reply.
    #[error("device {address} rejected the request with code {code}: {message}")]
    BadResponseCode {
        address: String,
        code: i64,
        message: String,
    },

    /// The device answered, but the body was not understood.
    #[error("unknown protocol error from {address}: {reason}")]
    MalformedResponse { address: String, reason: String },

    /// Failed to deserialize a registry or configuration document.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// Failed to parse an [`crate::Rgb`] from a string.
    #[error("invalid color string: {0}")]
    InvalidColorString(String),

    /// A configuration value is outside the range the controller can work with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn timeout(address: &str) -> Self {
        Error::Timeout {
            address: address.to_string(),
        }
    }

    pub fn transport(address: &str, reason: impl ToString) -> Self {
        Error::Transport {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn bad_response_code(address: &str, code: i64, message: impl ToString) -> Self {
        Error::BadResponseCode {
            address: address.to_string(),
            code,
            message: message.to_string(),
        }
    }

    pub fn malformed(address: &str, reason: impl ToString) -> Self {
        Error::MalformedResponse {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for failures where the device could not be reached at all.
    ///
    /// The panel words these as "check that the device is connected to the
    /// network", as opposed to failures the device itself reported.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Timeout { .. } | Error::Transport { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
