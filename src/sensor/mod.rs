//! Sensor payload shaping for the Home Assistant sensor API.
//!
//! A decoded telegram maps to one payload per measurement, and the reader's
//! own health counters map to a fixed set of status sensors. Posting the
//! payloads is the caller's job; this module only renders them.

use crate::obis_registry::{DeviceClass, StateClass};
use crate::p1::structs::Telegram;
use crate::p1::P1ReadError;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// Sensor state that is either fixed when the payload is built or produced
/// at the moment the payload is rendered. Producers are re-evaluated on
/// every render and never memoized.
pub enum SensorState {
    Fixed(String),
    Producer(Box<dyn Fn() -> String>),
}

impl SensorState {
    pub fn resolve(&self) -> String {
        match self {
            SensorState::Fixed(value) => value.clone(),
            SensorState::Producer(producer) => producer(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SensorAttributes {
    pub unit_of_measurement: String,
    pub friendly_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obis_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

pub struct SensorPayload {
    pub state: SensorState,
    pub attributes: SensorAttributes,
}

impl SensorPayload {
    /// Render the payload in the sensor API's wire shape. The state is
    /// resolved now, not when the payload was built.
    pub fn to_json(&self) -> Value {
        json!({
            "state": self.state.resolve(),
            "attributes": &self.attributes,
        })
    }
}

pub fn entity_id(device_name: &str, key: &str) -> String {
    format!("sensor.{}_{}", device_name, key)
}

/// Map every measurement of a telegram to an (entity id, payload) pair.
pub fn telegram_sensors(telegram: &Telegram, device_name: &str) -> Vec<(String, SensorPayload)> {
    telegram
        .measurements
        .iter()
        .map(|(key, measurement)| {
            let payload = SensorPayload {
                state: SensorState::Fixed(measurement.value.clone()),
                attributes: SensorAttributes {
                    unit_of_measurement: measurement.unit.clone(),
                    friendly_name: measurement.friendly_name.clone(),
                    obis_code: Some(measurement.obis_code.clone()),
                    device_class: measurement.device_class,
                    state_class: measurement.state_class,
                    timestamp: measurement.timestamp.clone(),
                },
            };
            (entity_id(device_name, key), payload)
        })
        .collect()
}

/// Per classification failure counters, owned by the caller and carried
/// across read attempts.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ReadStats {
    pub timeouts: u64,
    pub decode_errors: u64,
    pub crc_errors: u64,
    pub format_errors: u64,
}

impl ReadStats {
    pub fn record(&mut self, error: &P1ReadError) {
        match error {
            P1ReadError::Timeout => self.timeouts += 1,
            P1ReadError::Decode => self.decode_errors += 1,
            P1ReadError::Crc => self.crc_errors += 1,
            P1ReadError::Format => self.format_errors += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.timeouts + self.decode_errors + self.crc_errors + self.format_errors
    }
}

pub fn utc_time_string() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn plain_attributes(friendly_name: &str, unit: &str) -> SensorAttributes {
    SensorAttributes {
        unit_of_measurement: unit.to_string(),
        friendly_name: friendly_name.to_string(),
        obis_code: None,
        device_class: None,
        state_class: None,
        timestamp: None,
    }
}

fn counter_sensor(id: &str, friendly_name: &str, count: u64) -> (String, SensorPayload) {
    (
        format!("sensor.smartmeter_{}", id),
        SensorPayload {
            state: SensorState::Fixed(count.to_string()),
            attributes: plain_attributes(friendly_name, ""),
        },
    )
}

/// Reader health sensors: one counter per error classification plus
/// last-update and uptime producers.
pub fn status_sensors(stats: &ReadStats, started_at: Instant) -> Vec<(String, SensorPayload)> {
    vec![
        counter_sensor("timeout_errors", "Timeout errors", stats.timeouts),
        counter_sensor("decode_errors", "Decode errors", stats.decode_errors),
        counter_sensor("crc_errors", "CRC errors", stats.crc_errors),
        counter_sensor("format_errors", "Format errors", stats.format_errors),
        (
            "sensor.smartmeter_last_update".to_string(),
            SensorPayload {
                state: SensorState::Producer(Box::new(utc_time_string)),
                attributes: plain_attributes("Last update", "time"),
            },
        ),
        (
            "sensor.smartmeter_uptime".to_string(),
            SensorPayload {
                state: SensorState::Producer(Box::new(move || {
                    started_at.elapsed().as_secs().to_string()
                })),
                attributes: plain_attributes("Uptime", "s"),
            },
        ),
    ]
}
