use dsmr2ha::sensor::{status_sensors, telegram_sensors};
use dsmr2ha::{read_telegram, Config, LineSource, P1ReadError, ReadStats};
use log::{error, info, warn};
use serde_json::Value;
use std::io::{self, BufRead};
use std::time::{Duration, Instant};

/// Raw telegram lines from stdin, terminators preserved. Exhausted input
/// yields the "no data" sentinel, which the reader reports as a timeout.
struct StdinLineSource {
    stdin: io::Stdin,
    eof: bool,
}

impl StdinLineSource {
    fn new() -> Self {
        StdinLineSource {
            stdin: io::stdin(),
            eof: false,
        }
    }
}

impl LineSource for StdinLineSource {
    fn read_line(&mut self) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        match self.stdin.lock().read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => {
                self.eof = true;
                None
            }
            Ok(_) => Some(buf),
        }
    }
}

fn main() {
    // Initialize logging
    let default_filter = std::env::var("DSMR2HA_LOG_LEVEL").unwrap_or("info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to load config: {}", e);
            std::process::exit(1);
        }
    };

    info!("Reading telegrams for device {}", config.device_name);

    let mut source = StdinLineSource::new();
    let mut stats = ReadStats::default();
    let started_at = Instant::now();
    let status_interval = Duration::from_secs(config.publish_interval);
    let mut last_status: Option<Instant> = None;

    loop {
        match read_telegram(&mut source) {
            Ok(telegram) => {
                let mut sensors = telegram_sensors(&telegram, &config.device_name);

                let status_due = last_status.map_or(true, |at| at.elapsed() >= status_interval);
                if status_due {
                    last_status = Some(Instant::now());
                    sensors.extend(status_sensors(&stats, started_at));
                }

                let output: serde_json::Map<String, Value> = sensors
                    .iter()
                    .map(|(id, payload)| (id.clone(), payload.to_json()))
                    .collect();
                println!("{}", Value::Object(output));
            }
            Err(e) => {
                if source.eof && e == P1ReadError::Timeout {
                    break;
                }
                stats.record(&e);
                warn!("Telegram read failed: {} ({})", e, e.kind());
                if source.eof {
                    break;
                }
            }
        }
    }

    info!("Input exhausted, {} read errors total", stats.total());
}
