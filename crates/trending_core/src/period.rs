use std::fmt;

use chrono::{DateTime, Datelike, TimeDelta, Utc};

/// Number of quarters probed before a quarterly page is declared unreachable.
pub const QUARTER_CANDIDATES: usize = 4;

/// A monthly summary counts as published once the month is past this day.
pub const MONTH_SETTLED_AFTER_DAY: u32 = 15;

/// Step back from "now" that always lands in the previous month when the
/// current one is not settled yet.
pub const MONTH_LOOKBACK_DAYS: i64 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    number: u8,
}

impl Quarter {
    /// Returns `None` unless `number` is 1..=4.
    pub fn new(year: i32, number: u8) -> Option<Self> {
        (1..=4).contains(&number).then_some(Self { year, number })
    }

    pub fn containing<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            number: (date.month0() / 3) as u8 + 1,
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn number(self) -> u8 {
        self.number
    }

    /// Q1 steps back to Q4 of the previous year.
    pub fn previous(self) -> Self {
        if self.number == 1 {
            Self {
                year: self.year - 1,
                number: 4,
            }
        } else {
            Self {
                year: self.year,
                number: self.number - 1,
            }
        }
    }

    /// The quarters probed for `now`: the current one first, then descending.
    pub fn candidates(now: &DateTime<Utc>) -> Vec<Quarter> {
        std::iter::successors(Some(Self::containing(now)), |q| Some(q.previous()))
            .take(QUARTER_CANDIDATES)
            .collect()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/Q{}", self.year, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Returns `None` unless `month` is 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn containing<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month whose summary should be published by `now`.
    ///
    /// Past the middle of the month the current month is used; before that
    /// its summary does not exist yet and the previous month is used.
    pub fn settled(now: &DateTime<Utc>) -> Self {
        if now.day() > MONTH_SETTLED_AFTER_DAY {
            Self::containing(now)
        } else {
            Self::containing(&(*now - TimeDelta::days(MONTH_LOOKBACK_DAYS)))
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-M{:02}", self.year, self.month)
    }
}

/// Start and stop of a reporting period as published by the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl PeriodBounds {
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.stop - self.start) / 2
    }

    /// Strictly after the midpoint; exactly at the midpoint the period is
    /// still considered young.
    pub fn is_past_midpoint(&self, now: &DateTime<Utc>) -> bool {
        *now > self.midpoint()
    }
}
