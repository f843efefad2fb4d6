//! Trigger specifications and next-run computation.
//!
//! The scheduler supports fixed daily, weekly, and hourly triggers only;
//! there is deliberately no cron expressiveness. All computation happens
//! in UTC so next-run times cannot drift across daylight-saving
//! boundaries regardless of the host's zone.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};

use crate::error::CoreError;

/// Interval setting value for daily triggers.
pub const INTERVAL_DAILY: &str = "daily";
/// Interval setting value for hourly triggers.
pub const INTERVAL_HOURLY: &str = "hourly";
/// Interval setting value for weekly triggers.
pub const INTERVAL_WEEKLY: &str = "weekly";

// ---------------------------------------------------------------------------
// TriggerSpec
// ---------------------------------------------------------------------------

/// When a job family's timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSpec {
    /// Every day at `hour`:00 UTC.
    Daily { hour: u32 },
    /// Every week on `weekday` at `hour`:00 UTC.
    Weekly { weekday: Weekday, hour: u32 },
    /// At the top of every hour.
    Hourly,
}

impl TriggerSpec {
    /// Build a trigger from persisted settings values.
    pub fn from_settings(interval: &str, hour: u32, weekday: &str) -> Result<Self, CoreError> {
        if hour > 23 {
            return Err(CoreError::Validation(format!(
                "Trigger hour must be 0-23, got {hour}"
            )));
        }
        match interval {
            INTERVAL_DAILY => Ok(Self::Daily { hour }),
            INTERVAL_HOURLY => Ok(Self::Hourly),
            INTERVAL_WEEKLY => {
                let weekday: Weekday = weekday.parse().map_err(|_| {
                    CoreError::Validation(format!("Unknown weekday: '{weekday}'"))
                })?;
                Ok(Self::Weekly { weekday, hour })
            }
            other => Err(CoreError::Validation(format!(
                "Unknown schedule interval: '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Next-run computation
// ---------------------------------------------------------------------------

/// The first instant strictly after `now` at which `spec` fires.
///
/// If today's configured hour has already passed, the next run is tomorrow
/// at that hour (weekly analog: next week).
pub fn next_run_after(now: DateTime<Utc>, spec: TriggerSpec) -> DateTime<Utc> {
    match spec {
        TriggerSpec::Daily { hour } => {
            let candidate = now
                .date_naive()
                .and_hms_opt(hour, 0, 0)
                .expect("hour validated to 0-23")
                .and_utc();
            if candidate > now {
                candidate
            } else {
                candidate + Duration::days(1)
            }
        }
        TriggerSpec::Weekly { weekday, hour } => {
            let days_ahead = (weekday.num_days_from_monday() + 7
                - now.weekday().num_days_from_monday())
                % 7;
            let candidate = (now.date_naive() + Duration::days(i64::from(days_ahead)))
                .and_hms_opt(hour, 0, 0)
                .expect("hour validated to 0-23")
                .and_utc();
            if candidate > now {
                candidate
            } else {
                candidate + Duration::days(7)
            }
        }
        TriggerSpec::Hourly => {
            let truncated = now
                .date_naive()
                .and_hms_opt(now.hour(), 0, 0)
                .expect("current hour is always valid")
                .and_utc();
            truncated + Duration::hours(1)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    // -- Daily ----------------------------------------------------------------

    #[test]
    fn daily_before_hour_fires_today() {
        let now = utc(2025, 6, 10, 1, 30, 0);
        let next = next_run_after(now, TriggerSpec::Daily { hour: 3 });
        assert_eq!(next, utc(2025, 6, 10, 3, 0, 0));
    }

    #[test]
    fn daily_after_hour_fires_tomorrow() {
        let now = utc(2025, 6, 10, 5, 0, 0);
        let next = next_run_after(now, TriggerSpec::Daily { hour: 3 });
        assert_eq!(next, utc(2025, 6, 11, 3, 0, 0));
    }

    #[test]
    fn daily_exactly_at_hour_fires_tomorrow() {
        // The trigger instant itself is considered "passed": a run firing
        // at exactly 03:00 must not immediately re-fire.
        let now = utc(2025, 6, 10, 3, 0, 0);
        let next = next_run_after(now, TriggerSpec::Daily { hour: 3 });
        assert_eq!(next, utc(2025, 6, 11, 3, 0, 0));
    }

    // -- Weekly ---------------------------------------------------------------

    #[test]
    fn weekly_later_this_week() {
        // 2025-06-10 is a Tuesday.
        let now = utc(2025, 6, 10, 12, 0, 0);
        let next = next_run_after(
            now,
            TriggerSpec::Weekly {
                weekday: Weekday::Fri,
                hour: 6,
            },
        );
        assert_eq!(next, utc(2025, 6, 13, 6, 0, 0));
    }

    #[test]
    fn weekly_same_day_passed_hour_fires_next_week() {
        let now = utc(2025, 6, 10, 12, 0, 0); // Tuesday noon
        let next = next_run_after(
            now,
            TriggerSpec::Weekly {
                weekday: Weekday::Tue,
                hour: 6,
            },
        );
        assert_eq!(next, utc(2025, 6, 17, 6, 0, 0));
    }

    #[test]
    fn weekly_same_day_upcoming_hour_fires_today() {
        let now = utc(2025, 6, 10, 4, 0, 0); // Tuesday 04:00
        let next = next_run_after(
            now,
            TriggerSpec::Weekly {
                weekday: Weekday::Tue,
                hour: 6,
            },
        );
        assert_eq!(next, utc(2025, 6, 10, 6, 0, 0));
    }

    // -- Hourly ---------------------------------------------------------------

    #[test]
    fn hourly_fires_at_top_of_next_hour() {
        let now = utc(2025, 6, 10, 7, 42, 10);
        let next = next_run_after(now, TriggerSpec::Hourly);
        assert_eq!(next, utc(2025, 6, 10, 8, 0, 0));
    }

    #[test]
    fn hourly_at_exact_hour_fires_next_hour() {
        let now = utc(2025, 6, 10, 7, 0, 0);
        let next = next_run_after(now, TriggerSpec::Hourly);
        assert_eq!(next, utc(2025, 6, 10, 8, 0, 0));
    }

    #[test]
    fn hourly_wraps_across_midnight() {
        let now = utc(2025, 6, 10, 23, 59, 59);
        let next = next_run_after(now, TriggerSpec::Hourly);
        assert_eq!(next, utc(2025, 6, 11, 0, 0, 0));
    }

    // -- from_settings --------------------------------------------------------

    #[test]
    fn settings_parse_daily() {
        let spec = TriggerSpec::from_settings("daily", 3, "monday").unwrap();
        assert_eq!(spec, TriggerSpec::Daily { hour: 3 });
    }

    #[test]
    fn settings_parse_weekly_with_weekday() {
        let spec = TriggerSpec::from_settings("weekly", 6, "saturday").unwrap();
        assert_eq!(
            spec,
            TriggerSpec::Weekly {
                weekday: Weekday::Sat,
                hour: 6
            }
        );
    }

    #[test]
    fn settings_parse_hourly_ignores_hour() {
        let spec = TriggerSpec::from_settings("hourly", 9, "monday").unwrap();
        assert_eq!(spec, TriggerSpec::Hourly);
    }

    #[test]
    fn settings_reject_bad_hour() {
        assert!(TriggerSpec::from_settings("daily", 24, "monday").is_err());
    }

    #[test]
    fn settings_reject_bad_interval_or_weekday() {
        assert!(TriggerSpec::from_settings("fortnightly", 3, "monday").is_err());
        assert!(TriggerSpec::from_settings("weekly", 3, "someday").is_err());
    }
}
