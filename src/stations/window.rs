use chrono::{DateTime, Duration, Local, SecondsFormat, Timelike};
use rand::Rng;

/// A span of airplay history, newest windows first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub since: DateTime<Local>,
    pub until: DateTime<Local>,
}

impl TimeWindow {
    pub fn since_param(&self) -> String {
        self.since.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    pub fn until_param(&self) -> String {
        self.until.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// Walks back from `now` in `steps` contiguous windows of roughly
/// `interval_hours`, each stretched by up to nine random minutes so repeated
/// runs do not hit identical boundaries.
pub fn time_windows(now: DateTime<Local>, steps: u32, interval_hours: u32) -> Vec<TimeWindow> {
    let mut rng = rand::rng();
    time_windows_with(now, steps, interval_hours, || rng.random_range(0..=9))
}

/// [`time_windows`] with the jitter source supplied by the caller.
pub fn time_windows_with<J>(
    now: DateTime<Local>,
    steps: u32,
    interval_hours: u32,
    mut jitter_minutes: J,
) -> Vec<TimeWindow>
where
    J: FnMut() -> i64,
{
    let mut until = now.with_nanosecond(0).unwrap_or(now);
    let mut windows = Vec::with_capacity(steps as usize);

    for _ in 0..steps {
        let since = until
            - Duration::hours(i64::from(interval_hours))
            - Duration::minutes(jitter_minutes());
        windows.push(TimeWindow { since, until });
        until = since;
    }

    windows
}
