use chrono::offset::Offset;
use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::consts::DISPLAY_TIME_FORMAT;
use crate::error::AppError;

/// Timezone used when rendering stored turn timestamps
#[derive(Debug, Clone, Copy)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = value else {
            return Ok(Timezone::Local);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    pub(crate) fn to_fixed_offset(self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Timezone::Local => {
                let local = utc.with_timezone(&Local);
                let offset = local.offset().fix();
                local.with_timezone(&offset)
            }
            Timezone::Named(tz) => {
                let local = utc.with_timezone(&tz);
                let offset = local.offset().fix();
                local.with_timezone(&offset)
            }
        }
    }

    /// Render an ISO-8601 timestamp in this timezone; unparseable input is returned as-is
    pub(crate) fn format_timestamp(self, ts: &str) -> String {
        match DateTime::parse_from_rfc3339(ts) {
            Ok(dt) => self
                .to_fixed_offset(dt.with_timezone(&Utc))
                .format(DISPLAY_TIME_FORMAT)
                .to_string(),
            Err(_) => ts.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_none_returns_local() {
        assert!(matches!(Timezone::parse(None).unwrap(), Timezone::Local));
    }

    #[test]
    fn parse_local_string_returns_local() {
        assert!(matches!(
            Timezone::parse(Some("LOCAL")).unwrap(),
            Timezone::Local
        ));
        assert!(matches!(
            Timezone::parse(Some("  local  ")).unwrap(),
            Timezone::Local
        ));
    }

    #[test]
    fn parse_utc_variants() {
        for raw in ["utc", "UTC", "z", "Z"] {
            let tz = Timezone::parse(Some(raw)).unwrap();
            assert!(matches!(tz, Timezone::Named(chrono_tz::UTC)));
        }
    }

    #[test]
    fn parse_named_timezone() {
        let tz = Timezone::parse(Some("Europe/Berlin")).unwrap();
        assert!(matches!(tz, Timezone::Named(chrono_tz::Europe::Berlin)));
    }

    #[test]
    fn parse_invalid_timezone_returns_error() {
        let err = Timezone::parse(Some("Mars/Olympus")).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn format_timestamp_converts_offset() {
        let tz = Timezone::Named(chrono_tz::UTC);
        assert_eq!(
            tz.format_timestamp("2026-02-12T10:00:00+02:00"),
            "2026-02-12 08:00:00"
        );
    }

    #[test]
    fn format_timestamp_named_zone() {
        let tz = Timezone::parse(Some("America/New_York")).unwrap();
        // EDT is UTC-4 in June
        assert_eq!(
            tz.format_timestamp("2026-06-15T12:00:00Z"),
            "2026-06-15 08:00:00"
        );
    }

    #[test]
    fn format_timestamp_keeps_unparseable_input() {
        let tz = Timezone::Named(chrono_tz::UTC);
        assert_eq!(tz.format_timestamp("yesterday"), "yesterday");
    }
}
