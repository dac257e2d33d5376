//! Purpose: Lenient date, datetime, and time wrapper types.
//! Exports: `Date`, `DateTime`, `Time`.
//! Role: String inputs go through the configured chrono layout lists (with
//! `rfc3339`/`rfc2822` sentinels and optional human aliases); numeric inputs
//! go through the unix-timestamp path; null is the zero instant.
//! Invariants: `Date` truncates to the day; `Time` drops the date portion.
//! Invariants: With the Date section disabled, wrappers decode strictly.

use std::fmt;

use chrono::{
    DateTime as ChronoDateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime,
    NaiveTime, Offset, TimeZone, Utc,
};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::config::{Config, DateConfig};
use crate::decode::scope;

/// A date (time pointing to a specific day).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Date(pub NaiveDate);

/// A specific moment in time, normalized to UTC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateTime(pub ChronoDateTime<Utc>);

/// A moment within a day (the day itself is not part of the value).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Time(pub NaiveTime);

impl Default for Date {
    fn default() -> Self {
        Date(epoch().date_naive())
    }
}

impl Default for DateTime {
    fn default() -> Self {
        DateTime(epoch())
    }
}

impl Default for Time {
    fn default() -> Self {
        Time(NaiveTime::MIN)
    }
}

// The zero instant.
fn epoch() -> ChronoDateTime<Utc> {
    ChronoDateTime::from_timestamp(0, 0).unwrap_or(ChronoDateTime::<Utc>::MIN_UTC)
}

/// Resolves the configured default timezone. `UTC`, `Z`, and fixed offsets
/// (`+HH:MM`) are supported; anything else warns and falls back to UTC.
fn default_offset(cfg: &DateConfig) -> FixedOffset {
    parse_offset(&cfg.timezone.default).unwrap_or_else(|| {
        tracing::warn!(
            timezone = %cfg.timezone.default,
            "unresolvable default timezone, falling back to UTC"
        );
        utc_offset()
    })
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn parse_offset(name: &str) -> Option<FixedOffset> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z")
    {
        return Some(utc_offset());
    }
    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn localize(naive: NaiveDateTime, offset: FixedOffset) -> ChronoDateTime<Utc> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(epoch)
}

/// Walks one layout list. Each layout is tried as an offset-aware datetime,
/// a naive datetime (interpreted in the default timezone), and a bare date.
fn parse_with_layouts(
    layouts: &[String],
    s: &str,
    offset: FixedOffset,
) -> Option<ChronoDateTime<Utc>> {
    for layout in layouts {
        match layout.as_str() {
            "rfc3339" => {
                if let Ok(parsed) = ChronoDateTime::parse_from_rfc3339(s) {
                    return Some(parsed.with_timezone(&Utc));
                }
            }
            "rfc2822" => {
                if let Ok(parsed) = ChronoDateTime::parse_from_rfc2822(s) {
                    return Some(parsed.with_timezone(&Utc));
                }
            }
            fmt => {
                if let Ok(parsed) = ChronoDateTime::parse_from_str(s, fmt) {
                    return Some(parsed.with_timezone(&Utc));
                }
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(localize(naive, offset));
                }
                if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                    return Some(localize(date.and_time(NaiveTime::MIN), offset));
                }
                // Pure wall-clock layouts: keep the time as written, no
                // timezone shifting.
                if let Ok(time) = NaiveTime::parse_from_str(s, fmt) {
                    return Some(Utc.from_utc_datetime(&epoch().date_naive().and_time(time)));
                }
            }
        }
    }
    None
}

fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Human aliases resolved against "now" in the default timezone. Each alias
/// maps to the start of its period.
fn resolve_alias(s: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let today = Utc::now().with_timezone(&offset).date_naive();
    match s.to_ascii_lowercase().as_str() {
        "today" => Some(today),
        "yesterday" => Some(today - Duration::days(1)),
        "tomorrow" => Some(today + Duration::days(1)),
        "this-week" => Some(today - Duration::days(i64::from(today.weekday().num_days_from_monday()))),
        "last-week" => {
            Some(today - Duration::days(i64::from(today.weekday().num_days_from_monday()) + 7))
        }
        "this-month" => month_start(today.year(), today.month()),
        "last-month" => {
            if today.month() == 1 {
                month_start(today.year() - 1, 12)
            } else {
                month_start(today.year(), today.month() - 1)
            }
        }
        "this-year" => month_start(today.year(), 1),
        "last-year" => month_start(today.year() - 1, 1),
        _ => None,
    }
}

// Magnitudes at or above this are taken as milliseconds when both unix
// interpretations are enabled (1e11 seconds is beyond year 5000).
const MILLIS_CUTOVER: f64 = 1e11;

fn from_unix_number(cfg: &DateConfig, n: f64) -> Option<ChronoDateTime<Utc>> {
    let numbers = &cfg.from_numbers;
    if numbers.is_disabled() {
        return None;
    }
    let as_millis = |n: f64| ChronoDateTime::from_timestamp_millis(n as i64);
    let as_seconds = |n: f64| {
        let secs = n.trunc() as i64;
        let nanos = ((n - n.trunc()) * 1e9).abs() as u32;
        ChronoDateTime::from_timestamp(secs, nanos)
    };

    match (numbers.unix_timestamp, numbers.unix_milli_timestamp) {
        (true, true) => {
            if n.abs() >= MILLIS_CUTOVER {
                as_millis(n)
            } else {
                as_seconds(n)
            }
        }
        (true, false) => as_seconds(n),
        (false, true) => as_millis(n),
        (false, false) => None,
    }
}

enum LayoutKind {
    Date,
    DateTime,
    Time,
}

/// The shared string path: aliases, configured layouts, then the numeric
/// fallback when the string itself is a number.
fn from_string(cfg: &Config, s: &str, kind: LayoutKind) -> Option<ChronoDateTime<Utc>> {
    let date_cfg = &cfg.date;
    let strings = &date_cfg.from_strings;
    let offset = default_offset(date_cfg);
    let s = s.trim();

    if strings.aliases {
        if let Some(date) = resolve_alias(s, offset) {
            return Some(localize(date.and_time(NaiveTime::MIN), offset));
        }
    }

    let layouts = match kind {
        LayoutKind::Date => &strings.layouts.date,
        LayoutKind::DateTime => &strings.layouts.date_time,
        LayoutKind::Time => &strings.layouts.time,
    };
    if let Some(parsed) = parse_with_layouts(layouts, s, offset) {
        return Some(parsed);
    }

    if strings.respect_from_numbers_logic && !date_cfg.from_numbers.is_disabled() {
        if let Ok(n) = s.parse::<f64>() {
            return from_unix_number(date_cfg, n);
        }
    }

    None
}

struct MomentVisitor {
    cfg: std::sync::Arc<Config>,
    kind: LayoutKind,
}

impl MomentVisitor {
    fn from_number<E: de::Error>(&self, n: f64) -> Result<ChronoDateTime<Utc>, E> {
        if self.cfg.date.from_numbers.is_disabled() {
            return Err(E::custom("dirty date: dates from numbers are not allowed"));
        }
        from_unix_number(&self.cfg.date, n)
            .ok_or_else(|| E::custom(format!("dirty date: cannot parse numeric date ({n})")))
    }
}

impl<'de> Visitor<'de> for MomentVisitor {
    type Value = ChronoDateTime<Utc>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a lenient date or time")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        if self.cfg.date.from_strings.is_disabled() {
            return Err(E::custom("dirty date: string input not allowed"));
        }
        from_string(&self.cfg, s, self.kind)
            .ok_or_else(|| E::custom("dirty date: couldn't parse datetime value"))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Self::Value, E> {
        self.from_number(n as f64)
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Self::Value, E> {
        self.from_number(n as f64)
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Self::Value, E> {
        self.from_number(n)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        if self.cfg.date.from_null.is_disabled() {
            return Err(E::custom("dirty date: dates from nulls are not allowed"));
        }
        Ok(epoch())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Err(E::custom("dirty date: can't parse dates from boolean values"))
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cfg = scope::active();
        if cfg.date.is_disabled() {
            return ChronoDateTime::<Utc>::deserialize(deserializer).map(DateTime);
        }
        deserializer
            .deserialize_any(MomentVisitor {
                cfg,
                kind: LayoutKind::DateTime,
            })
            .map(DateTime)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cfg = scope::active();
        if cfg.date.is_disabled() {
            return NaiveDate::deserialize(deserializer).map(Date);
        }
        deserializer
            .deserialize_any(MomentVisitor {
                cfg,
                kind: LayoutKind::Date,
            })
            .map(|moment| Date(moment.date_naive()))
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cfg = scope::active();
        if cfg.date.is_disabled() {
            return NaiveTime::deserialize(deserializer).map(Time);
        }
        deserializer
            .deserialize_any(MomentVisitor {
                cfg,
                kind: LayoutKind::Time,
            })
            .map(|moment| Time(moment.time()))
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Datelike, NaiveDate, TimeZone, Utc};

    use super::{parse_offset, Date, DateTime, Time};
    use crate::config::Config;
    use crate::decode::scope::ConfigScope;

    fn scoped<T>(cfg: Config, run: impl FnOnce() -> T) -> T {
        let _scope = ConfigScope::enter(Arc::new(cfg));
        run()
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_offset("+02:00").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_offset("-05:30").unwrap().local_minus_utc(), -19800);
        assert!(parse_offset("Europe/Lisbon").is_none());
    }

    #[test]
    fn datetime_from_unix_seconds_string() {
        let parsed: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("\"1672671845\"").unwrap()
        });
        assert_eq!(
            parsed.0,
            Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap()
        );
    }

    #[test]
    fn datetime_from_unix_numbers() {
        let seconds: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("1672671845").unwrap()
        });
        let millis: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("1672671845000").unwrap()
        });
        assert_eq!(seconds.0, millis.0);
    }

    #[test]
    fn datetime_from_layouts() {
        let rfc: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("\"2023-01-02T15:04:05Z\"").unwrap()
        });
        assert_eq!(rfc.0, Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap());

        let plain: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("\"2023-01-02 15:04:05\"").unwrap()
        });
        assert_eq!(plain.0, rfc.0);

        let offset: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("\"2023-01-02T16:04:05+01:00\"").unwrap()
        });
        assert_eq!(offset.0, rfc.0);
    }

    #[test]
    fn date_truncates_to_day() {
        let date: Date = scoped(Config::standard(), || {
            serde_json::from_str("\"1672671845\"").unwrap()
        });
        assert_eq!(date.0, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());

        let date: Date = scoped(Config::standard(), || {
            serde_json::from_str("\"2023-01-02\"").unwrap()
        });
        assert_eq!(date.0, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
    }

    #[test]
    fn time_drops_the_date() {
        let time: Time = scoped(Config::standard(), || {
            serde_json::from_str("\"15:04:05\"").unwrap()
        });
        assert_eq!(time.0.to_string(), "15:04:05");
    }

    #[test]
    fn aliases_resolve_against_today() {
        let today: Date = scoped(Config::standard(), || {
            serde_json::from_str("\"today\"").unwrap()
        });
        assert_eq!(today.0, Utc::now().date_naive());

        let this_year: Date = scoped(Config::standard(), || {
            serde_json::from_str("\"this-year\"").unwrap()
        });
        assert_eq!(this_year.0.month(), 1);
        assert_eq!(this_year.0.day(), 1);

        let mut cfg = Config::standard();
        cfg.date.from_strings.aliases = false;
        scoped(cfg, || {
            assert!(serde_json::from_str::<Date>("\"today\"").is_err());
        });
    }

    #[test]
    fn null_yields_zero_instant() {
        let parsed: DateTime = scoped(Config::standard(), || {
            serde_json::from_str("null").unwrap()
        });
        assert_eq!(parsed.0.timestamp(), 0);

        let mut cfg = Config::standard();
        cfg.date.from_null.disabled = true;
        scoped(cfg, || {
            assert!(serde_json::from_str::<DateTime>("null").is_err());
        });
    }

    #[test]
    fn disabled_section_decodes_strictly() {
        scoped(Config::empty(), || {
            assert!(serde_json::from_str::<DateTime>("\"1672671845\"").is_err());
            let strict: DateTime =
                serde_json::from_str("\"2023-01-02T15:04:05Z\"").unwrap();
            assert_eq!(strict.0, Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap());
        });
    }

    #[test]
    fn booleans_are_rejected() {
        scoped(Config::standard(), || {
            assert!(serde_json::from_str::<DateTime>("true").is_err());
        });
    }
}
