use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use std::fmt;
use std::time::Duration;

/// When a worker wakes up for its next pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSchedule {
    /// At the top of every hour (`0 */1 * * *`)
    Hourly,
    /// A fixed delay after each pass
    Every(Duration),
}

impl RefreshSchedule {
    /// Hourly unless a fixed interval is configured
    pub fn from_interval(interval: Option<Duration>) -> Self {
        match interval {
            Some(interval) => RefreshSchedule::Every(interval),
            None => RefreshSchedule::Hourly,
        }
    }

    /// Time to sleep from `now` until the next pass
    pub fn delay_from(&self, now: DateTime<Utc>) -> Duration {
        match self {
            RefreshSchedule::Every(interval) => *interval,
            RefreshSchedule::Hourly => {
                let into_hour = ChronoDuration::minutes(now.minute() as i64)
                    + ChronoDuration::seconds(now.second() as i64)
                    + ChronoDuration::nanoseconds(now.nanosecond() as i64);
                (ChronoDuration::hours(1) - into_hour)
                    .to_std()
                    .unwrap_or(Duration::from_secs(3600))
            }
        }
    }

    pub fn next_delay(&self) -> Duration {
        self.delay_from(Utc::now())
    }
}

impl fmt::Display for RefreshSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshSchedule::Hourly => write!(f, "hourly"),
            RefreshSchedule::Every(interval) => write!(f, "every {}s", interval.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hourly_waits_until_top_of_hour() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 45, 30).unwrap();
        assert_eq!(RefreshSchedule::Hourly.delay_from(now), Duration::from_secs(14 * 60 + 30));
    }

    #[test]
    fn test_hourly_exactly_on_the_hour_waits_full_hour() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(RefreshSchedule::Hourly.delay_from(now), Duration::from_secs(3600));
    }

    #[test]
    fn test_fixed_interval() {
        let schedule = RefreshSchedule::from_interval(Some(Duration::from_secs(90)));
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 45, 30).unwrap();
        assert_eq!(schedule.delay_from(now), Duration::from_secs(90));
        assert_eq!(schedule.to_string(), "every 90s");
    }

    #[test]
    fn test_default_is_hourly() {
        assert_eq!(RefreshSchedule::from_interval(None), RefreshSchedule::Hourly);
    }
}
