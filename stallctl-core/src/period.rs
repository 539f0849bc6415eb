//! Calendar and dashboard date arithmetic

use chrono::{Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{CoreError, Result};

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || CoreError::InvalidMonth { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Current calendar date in the vendor's timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Inclusive date range; `None` leaves that side open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }
}

/// Dashboard reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    /// The last seven days plus today
    Week,
    /// From the first of the current month to today
    Month,
    All,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl Period {
    /// Interpret `?period=&start_date=&end_date=`.
    ///
    /// Unknown names are treated as a custom range; a custom range missing
    /// either date falls back to today.
    pub fn parse(
        name: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self> {
        match name.unwrap_or("today") {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            _ => match (start, end) {
                (Some(start), Some(end)) if start > end => {
                    Err(CoreError::InvalidDateRange { start, end })
                }
                (Some(start), Some(end)) => Ok(Self::Custom { start, end }),
                _ => Ok(Self::Today),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
            Self::Custom { .. } => "custom",
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match *self {
            Self::Today => DateRange::single(today),
            Self::Week => {
                let start = today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
                DateRange::new(start, today)
            }
            Self::Month => DateRange::new(today.with_day(1).unwrap_or(today), today),
            Self::All => DateRange::unbounded(),
            Self::Custom { start, end } => DateRange::new(start, end),
        }
    }
}
