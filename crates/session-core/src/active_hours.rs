use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};

/// Source of the wall-clock time of day.
pub trait WallClock {
    fn time_of_day(&self) -> NaiveTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn time_of_day(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same time; for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl WallClock for FixedClock {
    fn time_of_day(&self) -> NaiveTime {
        self.0
    }
}

/// Daily window during which trials may run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveHours {
    #[serde(with = "hms")]
    pub start_time: NaiveTime,
    #[serde(with = "hms")]
    pub stop_time: NaiveTime,
}

impl ActiveHours {
    pub fn new(start_time: NaiveTime, stop_time: NaiveTime) -> Self {
        Self {
            start_time,
            stop_time,
        }
    }

    /// True when `now` lies outside `[start, stop)`. A stop before the start
    /// means the window runs past midnight; equal bounds mean no restriction.
    pub fn is_sleep_time_at(&self, now: NaiveTime) -> bool {
        let active = if self.stop_time == self.start_time {
            true
        } else if self.stop_time < self.start_time {
            now >= self.start_time || now < self.stop_time
        } else {
            now >= self.start_time && now < self.stop_time
        };
        !active
    }

    pub fn is_sleep_time(&self, clock: &dyn WallClock) -> bool {
        self.is_sleep_time_at(clock.time_of_day())
    }
}

mod hms {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
