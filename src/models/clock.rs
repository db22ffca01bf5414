use chrono::{NaiveTime, Timelike};

/// Minutes elapsed since midnight; seconds are ignored.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
}

/// Serde adapter storing times of day as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        let time = parse_hhmm("09:30").unwrap();
        assert_eq!(minutes_since_midnight(time), 570);
    }

    #[test]
    fn accepts_trailing_seconds() {
        let time = parse_hhmm("17:45:59").unwrap();
        assert_eq!(minutes_since_midnight(time), 17 * 60 + 45);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hhmm("nine thirty").is_err());
        assert!(parse_hhmm("25:00").is_err());
    }
}
