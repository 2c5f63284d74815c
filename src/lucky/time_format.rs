//! Rendering of predicted block timestamps.

use crate::error::{LuckyMintError, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;

/// Display format for predicted timestamps. Parses back with
/// `DateTime::parse_from_str(s, TIMESTAMP_FORMAT)`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Formats unix timestamps either in local time or in a named IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimestampFormatter {
    zone: Option<Tz>,
}

impl TimestampFormatter {
    /// Formatter using the system's local time zone.
    pub fn local() -> Self {
        Self { zone: None }
    }

    /// Formatter for a named zone such as `Asia/Shanghai`.
    pub fn with_zone(zone: Tz) -> Self {
        Self { zone: Some(zone) }
    }

    /// Parse an optional zone name; `None` selects local time.
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        match name {
            None => Ok(Self::local()),
            Some(name) => {
                let zone: Tz = name
                    .trim()
                    .parse()
                    .map_err(|_| LuckyMintError::invalid(format!("unknown timezone {:?}", name)))?;
                Ok(Self::with_zone(zone))
            }
        }
    }

    /// The configured zone, if any.
    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    pub fn format(&self, timestamp: i64) -> Result<String> {
        let utc: DateTime<Utc> = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .ok_or_else(|| LuckyMintError::invalid(format!("timestamp out of range: {}", timestamp)))?;

        let rendered = match self.zone {
            Some(zone) => utc.with_timezone(&zone).format(TIMESTAMP_FORMAT).to_string(),
            None => utc.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
        };
        Ok(rendered)
    }
}
