#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidScheduleError;

/// The recurrence rule of an alarm: which calendar dates it fires on.
///
/// Time-of-day and timezone live on [`AlarmSchedule`]; a `CycleSpec` is pure
/// date selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CycleSpec {
    /// Given weekdays, every `interval` weeks.
    Weekly {
        days_of_week: Vec<Weekday>,
        interval: u32,
    },
    /// A fixed day number, every `interval` months. Days past the end of a
    /// target month clamp to that month's last day at evaluation time.
    MonthlyByDate { day_of_month: u8, interval: u32 },
    /// The Nth occurrence of a weekday, every `interval` months.
    /// `week_of_month` 1..=4 selects the Nth occurrence; 5 selects the last
    /// occurrence whether or not a fifth week exists.
    MonthlyRelative {
        week_of_month: u8,
        day_of_week: Weekday,
        interval: u32,
    },
    /// A fixed month and day, every `interval` years. Feb 29 clamps to
    /// Feb 28 in non-leap target years.
    Annual {
        month: u8,
        day_of_month: u8,
        interval: u32,
    },
    /// Every `interval_days` days counted from `anchor_date`.
    CustomDays {
        interval_days: u32,
        anchor_date: jiff::civil::Date,
    },
}

impl CycleSpec {
    /// Check every parameter against its declared domain.
    pub fn validate(&self) -> Result<(), InvalidScheduleError> {
        match self {
            CycleSpec::Weekly {
                days_of_week,
                interval,
            } => {
                if days_of_week.is_empty() {
                    return Err(InvalidScheduleError::field(
                        "weekly cycle requires at least one weekday",
                    ));
                }
                check_interval(*interval, "weeks")
            }
            CycleSpec::MonthlyByDate {
                day_of_month,
                interval,
            } => {
                check_range("day_of_month", *day_of_month, 1, 31)?;
                check_interval(*interval, "months")
            }
            CycleSpec::MonthlyRelative {
                week_of_month,
                interval,
                ..
            } => {
                check_range("week_of_month", *week_of_month, 1, 5)?;
                check_interval(*interval, "months")
            }
            CycleSpec::Annual {
                month,
                day_of_month,
                interval,
            } => {
                check_range("month", *month, 1, 12)?;
                check_range("day_of_month", *day_of_month, 1, 31)?;
                check_interval(*interval, "years")
            }
            CycleSpec::CustomDays { interval_days, .. } => {
                check_interval(*interval_days, "days")
            }
        }
    }
}

fn check_interval(interval: u32, unit: &str) -> Result<(), InvalidScheduleError> {
    if interval == 0 {
        Err(InvalidScheduleError::field(format!(
            "interval must be at least 1 {unit}"
        )))
    } else {
        Ok(())
    }
}

fn check_range(field: &str, value: u8, min: u8, max: u8) -> Result<(), InvalidScheduleError> {
    if value < min || value > max {
        Err(InvalidScheduleError::field(format!(
            "{field} must be {min}..={max}, got {value}"
        )))
    } else {
        Ok(())
    }
}

/// The slice of an alarm record the calculator consumes: cycle rule,
/// wall-clock fire time, and the timezone those apply in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlarmSchedule {
    pub cycle: CycleSpec,
    pub time_of_day: TimeOfDay,
    /// IANA timezone identifier. Resolved at evaluation time; an unknown
    /// name is an error, never a silent fallback.
    pub timezone: String,
    /// Week-interval anchor for `Weekly(interval > 1)`: the schedule's
    /// creation date. Absent means epoch-relative week alignment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub anchor: Option<jiff::civil::Date>,
    /// The previous fire instant, if any. When it is later than the supplied
    /// reference it becomes the effective reference, so a stale "now" never
    /// re-produces an occurrence that already fired.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_fired_at: Option<jiff::Timestamp>,
}

impl AlarmSchedule {
    /// Create a schedule with no anchor and no fire history.
    pub fn new(cycle: CycleSpec, time_of_day: TimeOfDay, timezone: impl Into<String>) -> Self {
        Self {
            cycle,
            time_of_day,
            timezone: timezone.into(),
            anchor: None,
            last_fired_at: None,
        }
    }

    /// Check the cycle parameters and time-of-day against their domains.
    /// Timezone resolution happens at evaluation time.
    pub fn validate(&self) -> Result<(), InvalidScheduleError> {
        self.cycle.validate()?;
        check_range("hour", self.time_of_day.hour, 0, 23)?;
        check_range("minute", self.time_of_day.minute, 0, 59)?;
        Ok(())
    }
}

/// Wall-clock time of day (hours and minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02}:{:02}", self.hour, self.minute))
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(serde::de::Error::custom("expected HH:MM"));
        }
        let hour = parts[0]
            .parse()
            .map_err(|_| serde::de::Error::custom("invalid hour"))?;
        let minute = parts[1]
            .parse()
            .map_err(|_| serde::de::Error::custom("invalid minute"))?;
        Ok(TimeOfDay { hour, minute })
    }
}

/// Day of week, ISO-numbered (Monday = 1 .. Sunday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Self::Monday => "mon",
            Self::Tuesday => "tue",
            Self::Wednesday => "wed",
            Self::Thursday => "thu",
            Self::Friday => "fri",
            Self::Saturday => "sat",
            Self::Sunday => "sun",
        }
    }

    pub fn to_jiff(self) -> jiff::civil::Weekday {
        match self {
            Self::Monday => jiff::civil::Weekday::Monday,
            Self::Tuesday => jiff::civil::Weekday::Tuesday,
            Self::Wednesday => jiff::civil::Weekday::Wednesday,
            Self::Thursday => jiff::civil::Weekday::Thursday,
            Self::Friday => jiff::civil::Weekday::Friday,
            Self::Saturday => jiff::civil::Weekday::Saturday,
            Self::Sunday => jiff::civil::Weekday::Sunday,
        }
    }

    pub fn from_jiff(wd: jiff::civil::Weekday) -> Self {
        match wd {
            jiff::civil::Weekday::Monday => Self::Monday,
            jiff::civil::Weekday::Tuesday => Self::Tuesday,
            jiff::civil::Weekday::Wednesday => Self::Wednesday,
            jiff::civil::Weekday::Thursday => Self::Thursday,
            jiff::civil::Weekday::Friday => Self::Friday,
            jiff::civil::Weekday::Saturday => Self::Saturday,
            jiff::civil::Weekday::Sunday => Self::Sunday,
        }
    }

    /// ISO 8601 day number: Monday=1, Sunday=7.
    pub fn number(self) -> u8 {
        match self {
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
            Self::Sunday => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            7 => Some(Self::Sunday),
            _ => None,
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_weekday(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {s}")))
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Monday),
        "tuesday" | "tue" => Some(Weekday::Tuesday),
        "wednesday" | "wed" => Some(Weekday::Wednesday),
        "thursday" | "thu" => Some(Weekday::Thursday),
        "friday" | "fri" => Some(Weekday::Friday),
        "saturday" | "sat" => Some(Weekday::Saturday),
        "sunday" | "sun" => Some(Weekday::Sunday),
        _ => None,
    }
}
