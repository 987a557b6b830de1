use std::fmt;

use crate::schedule::{AlarmSchedule, CycleSpec, TimeOfDay, Weekday};

impl fmt::Display for AlarmSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} in {}", self.cycle, self.time_of_day, self.timezone)?;
        if let Some(anchor) = &self.anchor {
            write!(f, " starting {anchor}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CycleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleSpec::Weekly {
                days_of_week,
                interval,
            } => {
                if *interval > 1 {
                    write!(f, "every {interval} weeks on ")?;
                } else {
                    write!(f, "every week on ")?;
                }
                write_day_list(f, days_of_week)
            }
            CycleSpec::MonthlyByDate {
                day_of_month,
                interval,
            } => {
                if *interval > 1 {
                    write!(f, "every {interval} months on day {day_of_month}")
                } else {
                    write!(f, "every month on day {day_of_month}")
                }
            }
            CycleSpec::MonthlyRelative {
                week_of_month,
                day_of_week,
                interval,
            } => {
                write!(
                    f,
                    "{} {} of ",
                    ordinal_str(*week_of_month),
                    day_of_week.as_str()
                )?;
                if *interval > 1 {
                    write!(f, "every {interval} months")
                } else {
                    write!(f, "every month")
                }
            }
            CycleSpec::Annual {
                month,
                day_of_month,
                interval,
            } => {
                if *interval > 1 {
                    write!(f, "every {interval} years on ")?;
                } else {
                    write!(f, "every year on ")?;
                }
                write!(f, "{} {day_of_month}", month_abbrev(*month))
            }
            CycleSpec::CustomDays {
                interval_days,
                anchor_date,
            } => {
                if *interval_days > 1 {
                    write!(f, "every {interval_days} days from {anchor_date}")
                } else {
                    write!(f, "every day from {anchor_date}")
                }
            }
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

fn write_day_list(f: &mut fmt::Formatter<'_>, days: &[Weekday]) -> fmt::Result {
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", day.short())?;
    }
    Ok(())
}

fn ordinal_str(week_of_month: u8) -> &'static str {
    match week_of_month {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        _ => "last",
    }
}

fn month_abbrev(month: u8) -> &'static str {
    match month {
        1 => "jan",
        2 => "feb",
        3 => "mar",
        4 => "apr",
        5 => "may",
        6 => "jun",
        7 => "jul",
        8 => "aug",
        9 => "sep",
        10 => "oct",
        11 => "nov",
        _ => "dec",
    }
}
