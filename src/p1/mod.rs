//! DSMR P1 telegram reader.
//!
//! A telegram is one header line starting with '/', any number of blank and
//! OBIS data lines, and a footer '!HHHH' whose CRC-16/ARC covers every raw
//! byte from the start of the header up to and including the '!'. The reader
//! consumes one line per iteration from a caller supplied source and either
//! returns a verified [`Telegram`] or a classified error.

pub mod line_parser;
pub mod structs;

use crate::checksum;
use crate::obis_registry;
use log::{debug, warn};
use structs::{Measurement, Telegram};
use thiserror::Error;

/// Terminal outcome of one failed read attempt.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum P1ReadError {
    #[error("no line received before the read deadline")]
    Timeout,
    #[error("received bytes are not valid text")]
    Decode,
    #[error("telegram checksum mismatch")]
    Crc,
    #[error("malformed data line")]
    Format,
}

impl P1ReadError {
    /// Stable lower case name, used for counters and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            P1ReadError::Timeout => "timeout",
            P1ReadError::Decode => "decode",
            P1ReadError::Crc => "crc",
            P1ReadError::Format => "format",
        }
    }
}

/// Source of raw telegram lines, terminator included. `None` is the
/// "no data before the deadline" sentinel; the source must bound its own
/// wait and never block forever.
pub trait LineSource {
    fn read_line(&mut self) -> Option<Vec<u8>>;
}

impl<F> LineSource for F
where
    F: FnMut() -> Option<Vec<u8>>,
{
    fn read_line(&mut self) -> Option<Vec<u8>> {
        self()
    }
}

/// Drive the line source until one complete telegram has been read and its
/// footer verified, or a terminal error occurred. Every call is an
/// independent attempt starting from a fresh checksum accumulator and an
/// empty measurement set; a failed attempt never exposes partial data.
pub fn read_telegram<S: LineSource>(source: &mut S) -> Result<Telegram, P1ReadError> {
    let mut telegram = Telegram::default();
    let mut in_telegram = false;
    let mut crc: u16 = 0;

    loop {
        let raw = source.read_line().ok_or(P1ReadError::Timeout)?;

        let line = match std::str::from_utf8(&raw) {
            Ok(text) => text.trim().to_string(),
            Err(_) => {
                warn!("undecodable line: {:02x?}", raw);
                return Err(P1ReadError::Decode);
            }
        };

        if line.is_empty() {
            crc = checksum::update(crc, &raw);
            continue;
        }

        if !in_telegram {
            if line.starts_with('/') {
                debug!("telegram header: {}", line);
                /* The checksum is seeded from the header's raw bytes */
                crc = checksum::update(0, &raw);
                telegram = Telegram::new(line);
                in_telegram = true;
            }
            // Anything else before the header is noise, keep waiting until
            // the next header resynchronizes the stream.
            continue;
        }

        if line.starts_with('!') {
            /* Only the '!' itself is part of the checksum input */
            crc = checksum::update(crc, b"!");
            let expected = format!("!{:04X}", crc);
            if line != expected {
                warn!("CRC error: {} {}", line, expected);
                return Err(P1ReadError::Crc);
            }
            return Ok(telegram);
        }

        crc = checksum::update(crc, &raw);

        match line_parser::parse_data_line(&line) {
            Some(data_line) => {
                let meta = obis_registry::lookup(&data_line.obis_code);
                debug!("{} -> {} = {}", data_line.obis_code, meta.key, data_line.value);
                /* A repeated OBIS code within one telegram overwrites the
                earlier value */
                telegram.measurements.insert(
                    meta.key,
                    Measurement {
                        obis_code: data_line.obis_code,
                        value: data_line.value,
                        unit: data_line.unit,
                        timestamp: data_line.timestamp,
                        friendly_name: meta.friendly_name,
                        device_class: meta.device_class,
                        state_class: meta.state_class,
                    },
                );
            }
            None => {
                warn!("line format is incorrect: {}", line);
                return Err(P1ReadError::Format);
            }
        }
    }
}
