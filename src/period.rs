//! Classifies transaction dates into periods: calendar months, Sunday-starting weeks and days.
//!
//! All dates are naive local calendar dates. "Today" is read from the local clock each time a
//! function without an explicit `today` argument is called, it is never cached.

use crate::Result;
use anyhow::{bail, ensure, Context};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The number of weekly buckets kept by the `recent` selector.
pub const RECENT_WEEKS: usize = 8;

const CURRENT_STR: &str = "current";
const RECENT_STR: &str = "recent";
const ALL_STR: &str = "all";

/// Today's date according to the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The Sunday that starts the week containing `date`. A Sunday is its own week start.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        ensure!(
            (1..=12).contains(&month),
            "Month must be between 1 and 12, got {month}"
        );
        Ok(Self { year, month })
    }

    /// The month that `date` falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((year, month)) = s.trim().split_once('-') else {
            bail!("Expected a month in the form YYYY-MM, got '{s}'");
        };
        ensure!(
            year.len() == 4 && month.len() == 2,
            "Expected a month in the form YYYY-MM, got '{s}'"
        );
        let year = year
            .parse::<i32>()
            .with_context(|| format!("Invalid year in '{s}'"))?;
        let month = month
            .parse::<u32>()
            .with_context(|| format!("Invalid month in '{s}'"))?;
        YearMonth::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Selects which transactions a view covers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodSelector {
    /// The calendar month containing today.
    #[default]
    Current,
    /// A specific calendar month.
    Month(YearMonth),
    /// A rolling window of the last `RECENT_WEEKS` Sunday-starting weeks, up to and including the
    /// current week.
    Recent,
    /// Every transaction, including those whose date cannot be read.
    All,
}

impl PeriodSelector {
    /// Returns true if `date` falls in this period, evaluated against the local clock.
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.matches_on(date, today())
    }

    /// Returns true if `date` falls in this period when today is `today`.
    pub fn matches_on(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            PeriodSelector::Current => YearMonth::of(today).contains(date),
            PeriodSelector::Month(month) => month.contains(date),
            PeriodSelector::Recent => {
                let end = week_start(today) + Duration::weeks(1);
                date >= recent_window_start(today) && date < end
            }
            PeriodSelector::All => true,
        }
    }

    /// The calendar month this selector pins to, if any. `Current` resolves against `today`.
    pub fn month_on(&self, today: NaiveDate) -> Option<YearMonth> {
        match self {
            PeriodSelector::Current => Some(YearMonth::of(today)),
            PeriodSelector::Month(month) => Some(*month),
            PeriodSelector::Recent | PeriodSelector::All => None,
        }
    }

    /// True for the selector that is not limited by date at all.
    pub fn is_all(&self) -> bool {
        matches!(self, PeriodSelector::All)
    }

    /// How chart buckets are cut for this selector.
    pub fn bucketing(&self) -> Bucketing {
        match self {
            PeriodSelector::Recent | PeriodSelector::All => Bucketing::Weekly,
            PeriodSelector::Current | PeriodSelector::Month(_) => Bucketing::Daily,
        }
    }
}

/// The first day of the `recent` window: the Sunday `RECENT_WEEKS - 1` weeks before the current
/// week's Sunday.
pub fn recent_window_start(today: NaiveDate) -> NaiveDate {
    week_start(today) - Duration::weeks(RECENT_WEEKS as i64 - 1)
}

impl Display for PeriodSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodSelector::Current => f.write_str(CURRENT_STR),
            PeriodSelector::Month(month) => Display::fmt(month, f),
            PeriodSelector::Recent => f.write_str(RECENT_STR),
            PeriodSelector::All => f.write_str(ALL_STR),
        }
    }
}

impl FromStr for PeriodSelector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            CURRENT_STR => Ok(PeriodSelector::Current),
            RECENT_STR => Ok(PeriodSelector::Recent),
            ALL_STR => Ok(PeriodSelector::All),
            other => other.parse().map(PeriodSelector::Month).with_context(|| {
                format!("Invalid period '{other}', expected 'current', 'recent', 'all' or YYYY-MM")
            }),
        }
    }
}

impl Serialize for PeriodSelector {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The width of a chart bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucketing {
    /// One bucket per Sunday-starting week, keyed by the Sunday.
    Weekly,
    /// One bucket per calendar day.
    Daily,
}

impl Bucketing {
    /// The bucket key for `date`.
    pub fn key(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucketing::Weekly => week_start(date),
            Bucketing::Daily => date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_week_start_is_previous_sunday() {
        // 2025-08-01 is a Friday
        assert_eq!(week_start(d("2025-08-01")), d("2025-07-27"));
        assert_eq!(week_start(d("2025-08-02")), d("2025-07-27"));
    }

    #[test]
    fn test_sunday_starts_its_own_week() {
        assert_eq!(week_start(d("2025-08-03")), d("2025-08-03"));
        assert_eq!(week_start(d("2025-08-09")), d("2025-08-03"));
    }

    #[test]
    fn test_week_start_crosses_year_boundary() {
        // 2026-01-01 is a Thursday
        assert_eq!(week_start(d("2026-01-01")), d("2025-12-28"));
    }

    #[test]
    fn test_year_month_parse_and_display() {
        let month: YearMonth = "2025-07".parse().unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 7);
        assert_eq!(month.to_string(), "2025-07");
    }

    #[test]
    fn test_year_month_parse_errors() {
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025-7".parse::<YearMonth>().is_err());
        assert!("July".parse::<YearMonth>().is_err());
        assert!("2025-00".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_selector_parse() {
        assert_eq!(
            "current".parse::<PeriodSelector>().unwrap(),
            PeriodSelector::Current
        );
        assert_eq!(
            "recent".parse::<PeriodSelector>().unwrap(),
            PeriodSelector::Recent
        );
        assert_eq!(
            "2025-07".parse::<PeriodSelector>().unwrap(),
            PeriodSelector::Month(YearMonth::new(2025, 7).unwrap())
        );
        assert!("last-week".parse::<PeriodSelector>().is_err());
        assert_eq!(PeriodSelector::Recent.to_string(), "recent");
    }

    #[test]
    fn test_current_uses_year_and_month() {
        let today = d("2025-08-15");
        assert!(PeriodSelector::Current.matches_on(d("2025-08-01"), today));
        assert!(PeriodSelector::Current.matches_on(d("2025-08-31"), today));
        assert!(!PeriodSelector::Current.matches_on(d("2025-07-31"), today));
        assert!(!PeriodSelector::Current.matches_on(d("2024-08-15"), today));
    }

    #[test]
    fn test_specific_month_ignores_today() {
        let july = PeriodSelector::Month(YearMonth::new(2025, 7).unwrap());
        assert!(july.matches_on(d("2025-07-01"), d("2030-01-01")));
        assert!(!july.matches_on(d("2025-08-01"), d("2030-01-01")));
    }

    #[test]
    fn test_recent_window() {
        // Friday; the current week starts on Sunday 2025-08-10
        let today = d("2025-08-15");
        assert_eq!(recent_window_start(today), d("2025-06-22"));
        assert!(PeriodSelector::Recent.matches_on(d("2025-06-22"), today));
        assert!(!PeriodSelector::Recent.matches_on(d("2025-06-21"), today));
        assert!(PeriodSelector::Recent.matches_on(d("2025-08-16"), today));
        assert!(!PeriodSelector::Recent.matches_on(d("2025-08-17"), today));
    }

    #[test]
    fn test_bucketing_by_selector() {
        assert_eq!(PeriodSelector::Recent.bucketing(), Bucketing::Weekly);
        assert_eq!(PeriodSelector::Current.bucketing(), Bucketing::Daily);
        assert_eq!(Bucketing::Daily.key(d("2025-07-09")), d("2025-07-09"));
        assert_eq!(Bucketing::Weekly.key(d("2025-07-09")), d("2025-07-06"));
    }

    #[test]
    fn test_weekly_buckets_partition_dates() {
        let dates: Vec<NaiveDate> = (0..60)
            .map(|i| d("2025-05-01") + Duration::days(i * 3 % 57))
            .collect();

        let mut buckets: BTreeMap<NaiveDate, Vec<NaiveDate>> = BTreeMap::new();
        for date in &dates {
            buckets
                .entry(Bucketing::Weekly.key(*date))
                .or_default()
                .push(*date);
        }

        // Idempotent: a bucket key is its own key.
        for key in buckets.keys() {
            assert_eq!(Bucketing::Weekly.key(*key), *key);
        }

        // Disjoint and complete: every date appears once, inside its week.
        let mut union: Vec<NaiveDate> = buckets.values().flatten().copied().collect();
        union.sort();
        let mut expected = dates.clone();
        expected.sort();
        assert_eq!(union, expected);
        for (key, members) in &buckets {
            for member in members {
                assert!(*member >= *key && *member < *key + Duration::weeks(1));
            }
        }
    }

    #[test]
    fn test_all_matches_every_date() {
        assert_eq!("all".parse::<PeriodSelector>().unwrap(), PeriodSelector::All);
        assert_eq!(PeriodSelector::All.to_string(), "all");
        assert!(PeriodSelector::All.matches_on(d("1999-01-01"), d("2025-08-15")));
        assert!(PeriodSelector::All.matches_on(d("2030-12-31"), d("2025-08-15")));
        assert_eq!(PeriodSelector::All.month_on(d("2025-08-15")), None);
        assert_eq!(PeriodSelector::All.bucketing(), Bucketing::Weekly);
    }

    #[test]
    fn test_month_on() {
        let today = d("2025-08-15");
        assert_eq!(
            PeriodSelector::Current.month_on(today),
            Some(YearMonth::new(2025, 8).unwrap())
        );
        assert_eq!(PeriodSelector::Recent.month_on(today), None);
    }
}
