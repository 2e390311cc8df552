//! Single-command exchange with a text-protocol device.

use log::{debug, warn};

use crate::command::Command;
use crate::errors::Error;
use crate::history::{CommandHistory, MessageType};
use crate::state::DeviceState;
use crate::transport::Transport;
use crate::types::PowerState;

type Result<T> = std::result::Result<T, Error>;

/// Sends commands to one device and keeps its [`DeviceState`] authoritative.
///
/// The cached state is written only from successful responses and is replaced
/// wholesale each time. Every failure is returned once to the caller, nothing
/// is retried, and the cache is left as it was.
#[derive(Debug)]
pub struct CommandProtocol<T> {
    address: String,
    transport: T,
    state: Option<DeviceState>,
    history: CommandHistory,
}

impl<T: Transport> CommandProtocol<T> {
    const ERROR_BODY_LIMIT: usize = 120;

    pub fn new(address: &str, transport: T) -> Self {
        CommandProtocol {
            address: address.to_string(),
            transport,
            state: None,
            history: CommandHistory::new(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Last state the device accepted, `None` before the first success.
    pub fn state(&self) -> Option<&DeviceState> {
        self.state.as_ref()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Send `command` and replace the cached state with the device's answer.
    pub async fn send(&mut self, command: &Command) -> Result<&DeviceState> {
        let state = self.exchange(command).await?;
        Ok(self.state.insert(state))
    }

    /// Query the full state.
    pub async fn query_state(&mut self) -> Result<&DeviceState> {
        self.send(&Command::QueryState).await
    }

    /// Toggle the relay.
    ///
    /// Succeeds only when the answer carries the `POWER` acknowledgement.
    pub async fn toggle_power(&mut self) -> Result<PowerState> {
        let state = self.exchange(&Command::PowerToggle).await?;
        let Some(power) = state.power() else {
            let err = Error::malformed(&self.address, "missing POWER acknowledgement");
            self.note_failure(&err);
            return Err(err);
        };
        self.state = Some(state);
        Ok(power)
    }

    async fn exchange(&mut self, command: &Command) -> Result<DeviceState> {
        let wire = command.to_string();
        debug!("{} <- {wire}", self.address);
        self.history.record(MessageType::Send, &wire, &wire);

        let response = match self.transport.execute(&self.address, &wire).await {
            Ok(response) => response,
            Err(err) => {
                self.note_failure(&err);
                return Err(err);
            }
        };

        debug!("{} -> {} {}", self.address, response.status, response.body);
        self.history
            .record(MessageType::Receive, &wire, &response.body);

        if !response.is_success() {
            let err = Error::bad_response_code(
                &self.address,
                i64::from(response.status),
                truncate(&response.body, Self::ERROR_BODY_LIMIT),
            );
            self.note_failure(&err);
            return Err(err);
        }

        match serde_json::from_str::<DeviceState>(&response.body) {
            Ok(state) => {
                if state.mixes_rgb_and_white() {
                    warn!(
                        "{} reports RGB and white channels lit together: {:?}",
                        self.address,
                        state.channels()
                    );
                }
                Ok(state)
            }
            Err(e) => {
                let err = Error::malformed(&self.address, e);
                self.note_failure(&err);
                Err(err)
            }
        }
    }

    fn note_failure(&mut self, err: &Error) {
        warn!("{err}");
        self.history.record_error(&err.to_string());
    }
}

fn truncate(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;
    use crate::transport::fake::FakeTasmota;
    use crate::types::Dimmer;

    const ADDRESS: &str = "192.168.1.40";

    #[tokio::test]
    async fn test_query_populates_state() {
        let device = FakeTasmota::new();
        let mut protocol = CommandProtocol::new(ADDRESS, device.clone());
        assert!(protocol.state().is_none());

        let state = protocol.query_state().await.unwrap();
        assert_eq!(state.dimmer().unwrap().value(), 50);
        assert_eq!(device.log(), ["STATE"]);
    }

    #[tokio::test]
    async fn test_state_is_replaced_wholesale() {
        let device = FakeTasmota::new();
        let mut protocol = CommandProtocol::new(ADDRESS, device.clone());
        protocol.query_state().await.unwrap();

        device.push_response(Ok(TransportResponse::new(200, r#"{"Dimmer":40}"#)));
        let state = protocol
            .send(&Command::Dimmer(Dimmer::create(40).unwrap()))
            .await
            .unwrap();
        assert_eq!(state.dimmer().unwrap().value(), 40);
        assert!(state.color_temperature().is_none());
    }

    #[tokio::test]
    async fn test_failures_leave_cache_untouched() {
        let device = FakeTasmota::new();
        let mut protocol = CommandProtocol::new(ADDRESS, device.clone());
        let before = protocol.query_state().await.unwrap().clone();

        let failures = [
            Err(Error::timeout(ADDRESS)),
            Err(Error::transport(ADDRESS, "connection refused")),
            Ok(TransportResponse::new(500, "oops")),
            Ok(TransportResponse::new(200, "<html>not json</html>")),
            Ok(TransportResponse::new(200, r#"{"HSBColor":"999,0,0"}"#)),
        ];
        for failure in failures {
            device.push_response(failure);
            assert!(protocol.query_state().await.is_err());
            assert_eq!(protocol.state(), Some(&before));
        }
        assert!(protocol.history().last_error().is_some());
    }

    #[tokio::test]
    async fn test_out_of_range_report_is_malformed() {
        let device = FakeTasmota::new();
        let mut protocol = CommandProtocol::new(ADDRESS, device.clone());
        let before = protocol.query_state().await.unwrap().clone();

        for body in [r#"{"Dimmer":250}"#, r#"{"CT":900}"#] {
            device.push_response(Ok(TransportResponse::new(200, body)));
            let err = protocol.query_state().await.unwrap_err();
            assert!(matches!(err, Error::MalformedResponse { .. }));
            assert_eq!(protocol.state(), Some(&before));
        }
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let device = FakeTasmota::new();
        let mut protocol = CommandProtocol::new(ADDRESS, device.clone());

        device.push_response(Err(Error::timeout(ADDRESS)));
        let err = protocol.query_state().await.unwrap_err();
        assert_eq!(err, Error::timeout(ADDRESS));
        assert!(err.is_connectivity());

        device.push_response(Ok(TransportResponse::new(404, "not found")));
        let err = protocol.query_state().await.unwrap_err();
        assert!(matches!(err, Error::BadResponseCode { code: 404, .. }));
        assert!(!err.is_connectivity());

        device.push_response(Ok(TransportResponse::new(200, "")));
        let err = protocol.query_state().await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_toggle_requires_acknowledgement() {
        let device = FakeTasmota::new();
        let mut protocol = CommandProtocol::new(ADDRESS, device.clone());

        assert_eq!(protocol.toggle_power().await.unwrap(), PowerState::Off);
        assert_eq!(protocol.toggle_power().await.unwrap(), PowerState::On);

        device.push_response(Ok(TransportResponse::new(200, r#"{"Dimmer":10}"#)));
        let err = protocol.toggle_power().await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert_eq!(protocol.state().unwrap().power(), Some(PowerState::On));
        assert_eq!(device.log(), ["Power Toggle", "Power Toggle", "Power Toggle"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
    }
}
