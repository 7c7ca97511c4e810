//! Clock abstraction and the duration arithmetic shared by every gate.
//!
//! Gates never read the wall clock directly; they ask a [`Clock`] so that
//! expiry decisions are reproducible under test.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Longest duration accepted from configuration.
pub const MAX_CONFIG_DURATION_DAYS: i64 = 36_500;

/// `None` when the end instant falls outside the representable range.
pub fn expires_at(created_at: DateTime<Utc>, duration: Duration) -> Option<DateTime<Utc>> {
    created_at.checked_add_signed(duration)
}

/// Time left before `created_at + duration`, or `None` once that instant
/// has been reached. Never builds the end instant, so any duration is safe.
pub fn remaining(
    created_at: DateTime<Utc>,
    duration: Duration,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let elapsed = now - created_at;
    if elapsed >= duration {
        return None;
    }
    Some(duration.checked_sub(&elapsed).unwrap_or(Duration::MAX))
}

/// True when strictly more than `max_age` has elapsed since `created_at`.
pub fn is_older_than(created_at: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    now - created_at > max_age
}

/// Parses `<integer><unit>` where unit is one of `ms`, `s`, `m`, `h`, `d`.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let s = raw.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("missing unit in duration '{raw}'"))?;
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("missing amount in duration '{raw}'"));
    }
    let amount: i64 = digits
        .parse()
        .map_err(|e| format!("invalid amount in duration '{raw}': {e}"))?;

    let parsed = match unit.trim() {
        "ms" => Duration::try_milliseconds(amount),
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        other => return Err(format!("unknown duration unit '{other}' in '{raw}'")),
    };
    parsed.ok_or_else(|| format!("duration '{raw}' is out of range"))
}

/// Inverse of [`parse_duration`], choosing the largest exact unit.
pub fn format_duration(d: Duration) -> String {
    let ms = d.num_milliseconds();
    const UNITS: [(i64, &str); 4] = [
        (86_400_000, "d"),
        (3_600_000, "h"),
        (60_000, "m"),
        (1_000, "s"),
    ];
    for (size, unit) in UNITS {
        if ms != 0 && ms % size == 0 {
            return format!("{}{}", ms / size, unit);
        }
    }
    format!("{ms}ms")
}
