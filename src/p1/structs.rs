use crate::obis_registry::{DeviceClass, StateClass};
use serde::Serialize;
use std::collections::HashMap;

/// One decoded data line together with its registry metadata. Value, unit
/// and timestamp are kept exactly as transmitted by the meter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Measurement {
    pub obis_code: String,
    pub value: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub friendly_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,
}

/// One complete meter transmission, only handed to the caller after its
/// footer checksum has been verified.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Telegram {
    pub header: String,
    pub measurements: HashMap<String, Measurement>,
}

impl Telegram {
    pub fn new(header: String) -> Self {
        Telegram {
            header,
            measurements: HashMap::new(),
        }
    }
}
