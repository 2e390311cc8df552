//! In-memory Tasmota light used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::{Transport, TransportResponse};
use crate::errors::Error;

/// Scripted device: answers commands from an in-memory state and logs every
/// command it receives, in order.
#[derive(Clone)]
pub(crate) struct FakeTasmota {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    state: Value,
    log: Vec<String>,
    scripted: VecDeque<Result<TransportResponse, Error>>,
}

impl FakeTasmota {
    /// A light in white mode at half brightness.
    pub(crate) fn new() -> Self {
        Self::with_state(json!({
            "POWER": "ON",
            "Dimmer": 50,
            "Color": "0000008000",
            "HSBColor": "0,0,0",
            "White": 50,
            "CT": 300,
            "Channel": [0, 0, 0, 50, 0],
        }))
    }

    pub(crate) fn with_state(state: Value) -> Self {
        FakeTasmota {
            inner: Arc::new(Mutex::new(Inner {
                state,
                log: Vec::new(),
                scripted: VecDeque::new(),
            })),
        }
    }

    /// Answer the next command with `response` instead of the simulated state.
    pub(crate) fn push_response(&self, response: Result<TransportResponse, Error>) {
        self.inner.lock().unwrap().scripted.push_back(response);
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    pub(crate) fn clear_log(&self) {
        self.inner.lock().unwrap().log.clear();
    }
}

impl Inner {
    fn apply(&mut self, command: &str) -> TransportResponse {
        let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
        let state = &mut self.state;
        match name {
            "STATE" => {}
            "Dimmer" => state["Dimmer"] = json!(arg.parse::<u8>().unwrap()),
            "CT" => {
                state["CT"] = json!(arg.parse::<u16>().unwrap());
                state["HSBColor"] = json!("0,0,0");
            }
            "Color" => {
                let channels: Vec<u8> = (0..5)
                    .map(|i| u8::from_str_radix(&arg[i * 2..i * 2 + 2], 16).unwrap())
                    .map(|c| ((f64::from(c) * 100.0) / 255.0).round() as u8)
                    .collect();
                state["Channel"] = json!(channels);
                state["Color"] = json!(arg);
                if channels[..3].iter().all(|c| *c == 0) {
                    state["HSBColor"] = json!("0,0,0");
                }
            }
            "HSBColor" => {
                state["HSBColor"] = json!(arg);
                state["Channel"] = if arg == "0,0,0" {
                    json!([0, 0, 0, 0, 0])
                } else {
                    json!([100, 50, 0, 0, 0])
                };
            }
            "Power" => {
                let on = state["POWER"] == "ON";
                state["POWER"] = json!(if on { "OFF" } else { "ON" });
                return TransportResponse::new(200, json!({"POWER": state["POWER"]}).to_string());
            }
            _ => return TransportResponse::new(200, r#"{"Command":"Unknown"}"#),
        }
        TransportResponse::new(200, state.to_string())
    }
}

impl Transport for FakeTasmota {
    async fn execute(&self, _address: &str, command: &str) -> Result<TransportResponse, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(command.to_string());
        match inner.scripted.pop_front() {
            Some(response) => response,
            None => Ok(inner.apply(command)),
        }
    }
}
