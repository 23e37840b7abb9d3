use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar year + month reporting window.
///
/// Ordering is chronological (derived field order: year, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The next calendar month, wrapping December into January.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// The previous calendar month, wrapping January into December.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // Month is validated on construction, so this cannot be out of range.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or_default())
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day() - chrono::Duration::days(1)
    }

    /// Place `day` inside this month, clamping to the month's last day when
    /// the month is shorter (Jan 31 -> Feb 28/29).
    pub fn clamp_day(self, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.last_day())
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }

    /// Human-readable label, e.g. "March 2026".
    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

/// Owned selection state for the active reporting period.
///
/// Exactly one period is selected at a time; the selector is passed to
/// consumers explicitly rather than living in ambient global state. There is
/// no bounds checking against data availability: periods with no matching
/// expenses aggregate to zero totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelector {
    current: Period,
}

impl PeriodSelector {
    /// Start at the month containing today (local time).
    pub fn this_month() -> Self {
        Self {
            current: Period::from_date(Local::now().date_naive()),
        }
    }

    pub fn starting_at(period: Period) -> Self {
        Self { current: period }
    }

    pub fn current(&self) -> Period {
        self.current
    }

    pub fn advance(&mut self) -> Period {
        self.current = self.current.next();
        self.current
    }

    pub fn retreat(&mut self) -> Period {
        self.current = self.current.prev();
        self.current
    }
}
