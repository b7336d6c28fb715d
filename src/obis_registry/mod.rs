use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Home Assistant device class of a measurement.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Energy,
    Power,
    Voltage,
    Current,
}

/// Home Assistant state class, total for accumulating registers and
/// measurement for instantaneous values.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StateClass {
    Total,
    Measurement,
}

/* friendly name, device class, state class */
type ObisEntry = (&'static str, Option<DeviceClass>, Option<StateClass>);

lazy_static! {
    static ref OBIS_CODES: HashMap<&'static str, ObisEntry> = get_standard_obis_codes();
}

fn get_standard_obis_codes() -> HashMap<&'static str, ObisEntry> {
    let mut map: HashMap<&'static str, ObisEntry> = HashMap::new();

    // Timestamp
    map.insert("0-0:1.0.0", ("Timestamp", None, None));

    // Energy registers
    map.insert("1-0:1.8.0", ("Total Energy Import", Some(DeviceClass::Energy), Some(StateClass::Total)));
    map.insert("1-0:2.8.0", ("Total Energy Export", Some(DeviceClass::Energy), Some(StateClass::Total)));
    map.insert("1-0:3.8.0", ("Total Reactive Energy Import", Some(DeviceClass::Energy), Some(StateClass::Total)));
    map.insert("1-0:4.8.0", ("Total Reactive Energy Export", Some(DeviceClass::Energy), Some(StateClass::Total)));

    // Instantaneous power
    map.insert("1-0:1.7.0", ("Instantaneous Power", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:2.7.0", ("Instantaneous Power Export", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:3.7.0", ("Instantaneous Reactive Power", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:4.7.0", ("Instantaneous Reactive Power Export", Some(DeviceClass::Power), Some(StateClass::Measurement)));

    // Per phase power
    map.insert("1-0:21.7.0", ("Current Power L1", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:41.7.0", ("Current Power L2", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:61.7.0", ("Current Power L3", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:22.7.0", ("Current Power Export L1", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:42.7.0", ("Current Power Export L2", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:62.7.0", ("Current Power Export L3", Some(DeviceClass::Power), Some(StateClass::Measurement)));

    // Per phase reactive power
    map.insert("1-0:23.7.0", ("Current Reactive Power L1", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:43.7.0", ("Current Reactive Power L2", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:63.7.0", ("Current Reactive Power L3", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:24.7.0", ("Current Reactive Power Export L1", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:44.7.0", ("Current Reactive Power Export L2", Some(DeviceClass::Power), Some(StateClass::Measurement)));
    map.insert("1-0:64.7.0", ("Current Reactive Power Export L3", Some(DeviceClass::Power), Some(StateClass::Measurement)));

    // Per phase voltage
    map.insert("1-0:32.7.0", ("Current Voltage L1", Some(DeviceClass::Voltage), Some(StateClass::Measurement)));
    map.insert("1-0:52.7.0", ("Current Voltage L2", Some(DeviceClass::Voltage), Some(StateClass::Measurement)));
    map.insert("1-0:72.7.0", ("Current Voltage L3", Some(DeviceClass::Voltage), Some(StateClass::Measurement)));

    // Per phase current
    map.insert("1-0:31.7.0", ("Current Current L1", Some(DeviceClass::Current), Some(StateClass::Measurement)));
    map.insert("1-0:51.7.0", ("Current Current L2", Some(DeviceClass::Current), Some(StateClass::Measurement)));
    map.insert("1-0:71.7.0", ("Current Current L3", Some(DeviceClass::Current), Some(StateClass::Measurement)));

    map
}

/// Registry metadata for one OBIS code, synthesized when the code is not in
/// the static table.
#[derive(Debug, Clone)]
pub struct SensorMeta {
    pub key: String,
    pub friendly_name: String,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
}

/// Look up an OBIS code. Known codes are keyed by their friendly name,
/// unknown codes fall back to a key derived from the code itself so that
/// every code maps to a stable sensor key.
pub fn lookup(obis_code: &str) -> SensorMeta {
    match OBIS_CODES.get(obis_code) {
        Some((friendly_name, device_class, state_class)) => SensorMeta {
            key: friendly_name.to_lowercase().replace(' ', "_"),
            friendly_name: friendly_name.to_string(),
            device_class: *device_class,
            state_class: *state_class,
        },
        None => SensorMeta {
            key: obis_code.replace('-', "_").replace('.', "_").replace(':', "_"),
            friendly_name: obis_code.to_string(),
            device_class: None,
            state_class: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_code() {
        let meta = lookup("1-0:1.8.0");
        assert_eq!(meta.key, "total_energy_import");
        assert_eq!(meta.friendly_name, "Total Energy Import");
        assert_eq!(meta.device_class, Some(DeviceClass::Energy));
        assert_eq!(meta.state_class, Some(StateClass::Total));
    }

    #[test]
    fn test_lookup_timestamp_has_no_classes() {
        let meta = lookup("0-0:1.0.0");
        assert_eq!(meta.key, "timestamp");
        assert_eq!(meta.friendly_name, "Timestamp");
        assert_eq!(meta.device_class, None);
        assert_eq!(meta.state_class, None);
    }

    #[test]
    fn test_lookup_unknown_code_synthesizes_key() {
        let meta = lookup("9-1:99.99.9");
        assert_eq!(meta.key, "9_1_99_99_9");
        assert_eq!(meta.friendly_name, "9-1:99.99.9");
        assert_eq!(meta.device_class, None);
        assert_eq!(meta.state_class, None);
    }

    #[test]
    fn test_device_class_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DeviceClass::Energy).unwrap(), "\"energy\"");
        assert_eq!(serde_json::to_string(&StateClass::Measurement).unwrap(), "\"measurement\"");
    }
}
