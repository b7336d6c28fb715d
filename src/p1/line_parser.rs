use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 0-1:24.2.1(241030120000W)(00123.456*m3) - timestamp group before the value group
    static ref WITH_TIMESTAMP: Regex =
        Regex::new(r"^([\d.:-]+)\((\d+[SW]?)\)\(([\w.]*)\*?([\w%]*)\)").unwrap();
    // 1-0:1.8.0(00042741.128*kWh)
    static ref WITHOUT_TIMESTAMP: Regex =
        Regex::new(r"^([\d.:-]+)\(([\w.]*)\*?([\w%]*)\)").unwrap();
}

/// Raw fields of one data line, before registry lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine {
    pub obis_code: String,
    pub value: String,
    pub unit: String,
    pub timestamp: Option<String>,
}

/// Split a decoded text line into OBIS code, value, unit and optional
/// embedded timestamp. `None` means the line is not a data line at all;
/// the reader escalates that instead of skipping it.
pub fn parse_data_line(line: &str) -> Option<DataLine> {
    if let Some(caps) = WITH_TIMESTAMP.captures(line) {
        return Some(DataLine {
            obis_code: caps[1].to_string(),
            value: caps[3].to_string(),
            unit: caps[4].to_string(),
            timestamp: Some(caps[2].to_string()),
        });
    }

    if let Some(caps) = WITHOUT_TIMESTAMP.captures(line) {
        return Some(DataLine {
            obis_code: caps[1].to_string(),
            value: caps[2].to_string(),
            unit: caps[3].to_string(),
            timestamp: None,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_with_unit() {
        let parsed = parse_data_line("1-0:1.8.0(00042741.128*kWh)").unwrap();
        assert_eq!(parsed.obis_code, "1-0:1.8.0");
        assert_eq!(parsed.value, "00042741.128");
        assert_eq!(parsed.unit, "kWh");
        assert_eq!(parsed.timestamp, None);
    }

    #[test]
    fn test_parse_value_without_unit() {
        let parsed = parse_data_line("0-0:1.0.0(241030120019W)").unwrap();
        assert_eq!(parsed.obis_code, "0-0:1.0.0");
        assert_eq!(parsed.value, "241030120019W");
        assert_eq!(parsed.unit, "");
        assert_eq!(parsed.timestamp, None);
    }

    #[test]
    fn test_parse_embedded_timestamp() {
        let parsed = parse_data_line("0-1:24.2.1(241030120000W)(00123.456*m3)").unwrap();
        assert_eq!(parsed.obis_code, "0-1:24.2.1");
        assert_eq!(parsed.value, "00123.456");
        assert_eq!(parsed.unit, "m3");
        assert_eq!(parsed.timestamp, Some("241030120000W".to_string()));
    }

    #[test]
    fn test_parse_percent_unit() {
        let parsed = parse_data_line("1-0:13.7.0(095*%)").unwrap();
        assert_eq!(parsed.value, "095");
        assert_eq!(parsed.unit, "%");
    }

    #[test]
    fn test_reject_non_data_lines() {
        assert_eq!(parse_data_line("garbage"), None);
        assert_eq!(parse_data_line("/ELL5\\253833635_A"), None);
        assert_eq!(parse_data_line("!F5D8"), None);
        assert_eq!(parse_data_line("1-0:1.8.0"), None);
        assert_eq!(parse_data_line("1-0:1.8.0(@@@)"), None);
    }
}
