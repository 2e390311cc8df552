//! In-memory bulb used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{BulbConnector, BulbLink, BulbProperties};
use crate::errors::Error;
use crate::types::{Dimmer, PowerState, Rgb};

/// Scripted bulb acting as both connector and link. Every call is logged.
#[derive(Clone)]
pub(crate) struct FakeBulb {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    properties: BulbProperties,
    log: Vec<String>,
    connect_failure: Option<Error>,
    failures: VecDeque<Error>,
}

impl FakeBulb {
    /// An orange bulb, on, at 80%.
    pub(crate) fn new() -> Self {
        FakeBulb {
            inner: Arc::new(Mutex::new(Inner {
                properties: BulbProperties {
                    power: PowerState::On,
                    brightness: Dimmer::create(80).unwrap(),
                    rgb: Rgb::rgb(255, 128, 0),
                },
                log: Vec::new(),
                connect_failure: None,
                failures: VecDeque::new(),
            })),
        }
    }

    pub(crate) fn fail_connect(&self, err: Error) {
        self.inner.lock().unwrap().connect_failure = Some(err);
    }

    /// Fail the next link operation with `err`.
    pub(crate) fn fail_next(&self, err: Error) {
        self.inner.lock().unwrap().failures.push_back(err);
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    pub(crate) fn power(&self) -> PowerState {
        self.inner.lock().unwrap().properties.power
    }

    fn call(&self, entry: String) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(entry);
        match inner.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl BulbConnector for FakeBulb {
    type Link = FakeBulb;

    async fn connect(&self, _address: &str) -> Result<FakeBulb, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push("connect".to_string());
        match inner.connect_failure.take() {
            Some(err) => Err(err),
            None => Ok(self.clone()),
        }
    }
}

impl BulbLink for FakeBulb {
    async fn get_properties(&mut self) -> Result<BulbProperties, Error> {
        self.call("get_properties".to_string())?;
        Ok(self.inner.lock().unwrap().properties)
    }

    async fn set_brightness(&mut self, brightness: Dimmer) -> Result<(), Error> {
        self.call(format!("set_brightness {}", brightness.value()))?;
        self.inner.lock().unwrap().properties.brightness = brightness;
        Ok(())
    }

    async fn set_rgb(&mut self, rgb: Rgb) -> Result<(), Error> {
        self.call(format!("set_rgb {}", rgb.packed()))?;
        self.inner.lock().unwrap().properties.rgb = rgb;
        Ok(())
    }

    async fn toggle(&mut self) -> Result<(), Error> {
        self.call("toggle".to_string())?;
        let mut inner = self.inner.lock().unwrap();
        inner.properties.power = PowerState::from(!inner.properties.power.is_on());
        Ok(())
    }
}
