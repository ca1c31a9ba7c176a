//! Time-window parsing for `--from` / `--until`.
//!
//! Expressions are interpreted against an explicit [`Timezone`] and an
//! explicit "now", never against process-wide state, and rendered as the
//! UTC ISO-8601 values the events endpoint expects.

use super::ValidationError;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Format of every value sent as `start_time` / `end_time`.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+0000";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

static RELATIVE_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:([+-])\s*)?(\d+)\s*(seconds?|secs?|minutes?|mins?|hours?|days?|weeks?)(\s+ago)?$",
    )
    .expect("relative time pattern is valid")
});

static OFFSET_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:UTC|GMT)?([+-])(\d{2}):?(\d{2})?$").expect("offset pattern is valid")
});

/// A timezone used to interpret naive dates and day keywords.
///
/// Only UTC and fixed offsets are understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(FixedOffset);

impl Timezone {
    pub fn utc() -> Self {
        Self(FixedOffset::east_opt(0).expect("zero offset is valid"))
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.local_minus_utc() == 0 {
            write!(f, "UTC")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for Timezone {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if matches!(
            trimmed.to_ascii_uppercase().as_str(),
            "UTC" | "Z" | "GMT" | "ETC/UTC" | "ETC/GMT"
        ) {
            return Ok(Self::utc());
        }

        let invalid = |reason: &str| ValidationError::InvalidTimezone {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let caps = OFFSET_EXPRESSION
            .captures(trimmed)
            .ok_or_else(|| invalid("expected UTC or a fixed offset such as +02:00"))?;

        let hours: i32 = caps[2].parse().map_err(|_| invalid("bad hours"))?;
        let minutes: i32 = caps
            .get(3)
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| invalid("bad minutes"))?
            .unwrap_or(0);
        if minutes >= 60 {
            return Err(invalid("minutes must be below 60"));
        }

        let sign = if &caps[1] == "-" { -1 } else { 1 };
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self)
            .ok_or_else(|| invalid("offset out of range"))
    }
}

/// The resolved `start_time` / `end_time` pair of an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TimeWindow {
    /// Parses optional `from` / `until` expressions in one timezone.
    pub fn resolve(
        from: Option<&str>,
        until: Option<&str>,
        timezone: &Timezone,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            start_time: from.map(|e| parse_time(e, timezone, now)).transpose()?,
            end_time: until.map(|e| parse_time(e, timezone, now)).transpose()?,
        })
    }
}

/// Parses a human time expression into the API's UTC timestamp format.
///
/// Understood forms: RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS]`, `YYYY-MM-DD`,
/// `now`, `today`, `yesterday`, `tomorrow`, and relative offsets such as
/// `3 days ago`, `-2 hours` or `+1 week`.
pub fn parse_time(
    expression: &str,
    timezone: &Timezone,
    now: DateTime<Utc>,
) -> Result<String, ValidationError> {
    let resolved = resolve_instant(expression, timezone, now).ok_or_else(|| {
        ValidationError::InvalidTime {
            input: expression.to_string(),
        }
    })?;
    Ok(resolved.format(QUERY_TIME_FORMAT).to_string())
}

fn resolve_instant(
    expression: &str,
    timezone: &Timezone,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let trimmed = expression.trim();
    let lowered = trimmed.to_ascii_lowercase();

    match lowered.as_str() {
        "now" => return Some(now),
        "today" | "midnight" => return local_midnight(now, timezone, 0),
        "yesterday" => return local_midnight(now, timezone, -1),
        "tomorrow" => return local_midnight(now, timezone, 1),
        _ => {}
    }

    if let Some(caps) = RELATIVE_EXPRESSION.captures(&lowered) {
        let amount: i64 = caps[2].parse().ok()?;
        let delta = unit_delta(&caps[3], amount)?;
        let backwards = caps.get(1).is_some_and(|s| s.as_str() == "-");
        let ago = caps.get(4).is_some();
        return if backwards != ago {
            now.checked_sub_signed(delta)
        } else {
            now.checked_add_signed(delta)
        };
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;

    localize(naive, timezone)
}

fn unit_delta(unit: &str, amount: i64) -> Option<TimeDelta> {
    if unit.starts_with("sec") {
        TimeDelta::try_seconds(amount)
    } else if unit.starts_with("min") {
        TimeDelta::try_minutes(amount)
    } else if unit.starts_with("hour") {
        TimeDelta::try_hours(amount)
    } else if unit.starts_with("day") {
        TimeDelta::try_days(amount)
    } else {
        TimeDelta::try_weeks(amount)
    }
}

fn local_midnight(now: DateTime<Utc>, timezone: &Timezone, day_shift: i64) -> Option<DateTime<Utc>> {
    let local_date = now.with_timezone(&timezone.offset()).date_naive();
    let shifted = local_date.checked_add_signed(TimeDelta::try_days(day_shift)?)?;
    localize(shifted.and_time(NaiveTime::MIN), timezone)
}

fn localize(naive: NaiveDateTime, timezone: &Timezone) -> Option<DateTime<Utc>> {
    timezone
        .offset()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
