//! Decode DSMR P1 smart meter telegrams into Home Assistant sensor data.
//!
//! The reader consumes raw serial lines from a caller supplied source,
//! verifies the telegram's CRC-16/ARC footer and returns the measurements
//! keyed by sensor name. Publishing, retries and connectivity stay with the
//! caller.

pub mod checksum;
pub mod config;
pub mod obis_registry;
pub mod p1;
pub mod sensor;

// Re-export common types for easier access
pub use config::Config;
pub use p1::structs::{Measurement, Telegram};
pub use p1::{read_telegram, LineSource, P1ReadError};
pub use sensor::{ReadStats, SensorPayload, SensorState};
