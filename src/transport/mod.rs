//! Transport abstraction for the text-protocol device family.
//!
//! A [`Transport`] carries one command to one device and hands back whatever
//! status and body the device answered with. Interpreting that answer is the
//! job of [`crate::CommandProtocol`]; the transport only decides between
//! "got an answer" and a connectivity failure ([`Error::Timeout`] or
//! [`Error::Transport`]).

use std::future::Future;

use crate::errors::Error;

mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpTransport;

/// Raw answer to a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        TransportResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for sending one command to a device.
///
/// Implementations must bound every call with a timeout and must not retry.
pub trait Transport: Send + Sync {
    /// Send `command` to the device at `address`.
    fn execute(
        &self,
        address: &str,
        command: &str,
    ) -> impl Future<Output = Result<TransportResponse, Error>> + Send;
}

impl<T: Transport> Transport for &T {
    fn execute(
        &self,
        address: &str,
        command: &str,
    ) -> impl Future<Output = Result<TransportResponse, Error>> + Send {
        (**self).execute(address, command)
    }
}
