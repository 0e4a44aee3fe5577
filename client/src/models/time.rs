use chrono::FixedOffset;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Nepal runs on UTC+05:45; all booking timestamps are interpreted there.
pub const NEPAL_UTC_OFFSET_SECS: i32 = 5 * 3600 + 45 * 60;

static NEPAL_OFFSET: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(NEPAL_UTC_OFFSET_SECS).expect("UTC+05:45 is a valid offset"));

/// The fixed offset for Nepal time.
pub fn nepal_offset() -> FixedOffset {
    *NEPAL_OFFSET
}

/// Wall-clock time on the booking grid, minute granularity.
///
/// Provider schedules arrive as 12-hour strings ("8:00 AM"), booked slots as
/// zero-padded 24-hour strings ("14:00:00"). Both parse into the same value;
/// the canonical form is always `HH:MM:SS`, so the derived ordering agrees
/// with lexical comparison of canonical strings. A trailing seconds component
/// is accepted on input and dropped; the grid never subdivides a minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime {
    minutes: u16,
}

/// Error returned when a wall-clock time string cannot be parsed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid wall-clock time: {0:?}")]
pub struct TimeParseError(pub String);

impl SlotTime {
    /// Construct from an hour and minute.
    ///
    /// # Panics
    /// Panics if `hour >= 24` or `minute >= 60`. Use [`SlotTime::from_str`]
    /// for untrusted input.
    pub const fn hm(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60);
        Self {
            minutes: hour * 60 + minute,
        }
    }

    /// Construct from minutes past midnight, if in range.
    pub const fn from_minutes(minutes_of_day: u16) -> Option<Self> {
        if minutes_of_day < 24 * 60 {
            Some(Self {
                minutes: minutes_of_day,
            })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u16 {
        self.minutes % 60
    }

    pub fn minutes_of_day(&self) -> u16 {
        self.minutes
    }

    /// Canonical zero-padded 24-hour form, e.g. `"08:00:00"`.
    pub fn canonical(&self) -> String {
        format!("{:02}:{:02}:00", self.hour(), self.minute())
    }

    /// Human-readable 12-hour label, e.g. `"08:00 AM"` or `"01:00 PM"`.
    pub fn label_12h(&self) -> String {
        let (h, meridiem) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{:02}:{:02} {}", h, self.minute(), meridiem)
    }

    /// Add minutes, wrapping past midnight the way the backend's time-only
    /// arithmetic does when an end-with-buffer crosses the day boundary.
    pub fn add_minutes(&self, minutes: u32) -> Self {
        let total = (self.minutes as u32 + minutes) % (24 * 60);
        Self {
            minutes: total as u16,
        }
    }

    pub fn to_naive(&self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .expect("minutes_of_day is always below 24:00")
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl FromStr for SlotTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let err = || TimeParseError(s.to_string());

        // 12-hour form: "8:00 AM" / "08:00 pm"
        let (clock, meridiem) = match raw.rsplit_once(char::is_whitespace) {
            Some((clock, tail)) if tail.eq_ignore_ascii_case("am") => (clock.trim(), Some(false)),
            Some((clock, tail)) if tail.eq_ignore_ascii_case("pm") => (clock.trim(), Some(true)),
            _ => (raw, None),
        };

        let mut parts = clock.split(':');
        let hour: u16 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(err)?;
        let minute: u16 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(err)?;
        if let Some(second) = parts.next() {
            let second: u16 = second.parse().map_err(|_| err())?;
            if second >= 60 {
                return Err(err());
            }
        }
        if parts.next().is_some() || minute >= 60 {
            return Err(err());
        }

        let hour = match meridiem {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => return Err(err()),
            Some(false) => hour % 12,
            Some(true) => hour % 12 + 12,
        };
        if hour >= 24 {
            return Err(err());
        }

        Ok(Self::hm(hour, minute))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
