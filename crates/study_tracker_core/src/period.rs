//! crates/study_tracker_core/src/period.rs
//!
//! Translates a named report period into the `[from, to]` range it covers.
//! Offsets are fixed day counts, not calendar months or years.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// A named relative time window used to bound report queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Week,
    Month,
    Year,
    All,
}

/// How the week window treats the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekWindow {
    /// Exactly seven days back from now.
    #[default]
    Rolling,
    /// Today plus the six previous UTC calendar days.
    IncludeToday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Period {
    /// Parses a query value. Anything missing or unknown is treated as `Week`.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }

    pub fn range(self, now: DateTime<Utc>, week_window: WeekWindow) -> DateRange {
        let from = match self {
            Period::Week => match week_window {
                WeekWindow::Rolling => now - Duration::days(7),
                WeekWindow::IncludeToday => {
                    let day = (now - Duration::days(6)).date_naive();
                    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
                }
            },
            Period::Month => now - Duration::days(30),
            Period::Year => now - Duration::days(365),
            Period::All => DateTime::<Utc>::UNIX_EPOCH,
        };
        DateRange { from, to: now }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeekWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rolling" => Ok(WeekWindow::Rolling),
            "include-today" => Ok(WeekWindow::IncludeToday),
            other => Err(format!("'{}' is not one of: rolling, include-today", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn unknown_or_missing_period_defaults_to_week() {
        assert_eq!(Period::from_query(None), Period::Week);
        assert_eq!(Period::from_query(Some("fortnight")), Period::Week);
        assert_eq!(Period::from_query(Some("year")), Period::Year);
    }

    #[test]
    fn from_never_exceeds_now() {
        let now = at(2024, 6, 30, 15);
        for period in [Period::Week, Period::Month, Period::Year, Period::All] {
            for window in [WeekWindow::Rolling, WeekWindow::IncludeToday] {
                let range = period.range(now, window);
                assert!(range.from <= now, "{period} {window:?}");
                assert_eq!(range.to, now);
            }
        }
    }

    #[test]
    fn all_starts_at_epoch() {
        let range = Period::All.range(at(2024, 6, 30, 15), WeekWindow::Rolling);
        assert_eq!(range.from, at(1970, 1, 1, 0));
    }

    #[test]
    fn month_is_thirty_fixed_days() {
        let range = Period::Month.range(at(2024, 6, 30, 9), WeekWindow::Rolling);
        assert_eq!(range.from, at(2024, 5, 31, 9));
    }

    #[test]
    fn year_ignores_leap_days() {
        // 2024 has 366 days: a year back from 2025-01-01 stops at 2024-01-02,
        // and from 2024-12-31 it reaches 2024-01-01.
        let range = Period::Year.range(at(2025, 1, 1, 0), WeekWindow::Rolling);
        assert_eq!(range.from, at(2024, 1, 2, 0));
        let range = Period::Year.range(at(2024, 12, 31, 0), WeekWindow::Rolling);
        assert_eq!(range.from, at(2024, 1, 1, 0));
    }

    #[test]
    fn week_window_choices() {
        let now = at(2024, 6, 30, 15);
        assert_eq!(Period::Week.range(now, WeekWindow::Rolling).from, at(2024, 6, 23, 15));
        assert_eq!(Period::Week.range(now, WeekWindow::IncludeToday).from, at(2024, 6, 24, 0));
    }

    #[test]
    fn week_window_parses_config_values() {
        assert_eq!("Rolling".parse::<WeekWindow>(), Ok(WeekWindow::Rolling));
        assert_eq!("include-today".parse::<WeekWindow>(), Ok(WeekWindow::IncludeToday));
        assert!("calendar".parse::<WeekWindow>().is_err());
    }
}
