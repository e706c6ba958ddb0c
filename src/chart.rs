//! Turns a transaction snapshot into the bucketed series behind the car and grocery charts.

use crate::model::{Amount, Category, CategoryGroup, Transaction, Transactions};
use crate::period::{self, PeriodSelector, RECENT_WEEKS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LABEL_FORMAT: &str = "%-d %b";

/// Which chart to build.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Car spending against fuel reimbursements.
    Car,
    /// Groceries, dining and small shop spending.
    Grocery,
}

serde_plain::derive_display_from_serialize!(ChartKind);
serde_plain::derive_fromstr_from_deserialize!(ChartKind);

impl ChartKind {
    pub fn group(&self) -> CategoryGroup {
        match self {
            ChartKind::Car => CategoryGroup::Car,
            ChartKind::Grocery => CategoryGroup::Grocery,
        }
    }
}

/// One week or one day of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// The Sunday starting the week, or the day itself.
    pub start: NaiveDate,
    /// A short label such as "3 Aug".
    pub label: String,
    /// Amounts per category present in the bucket, credits included.
    pub by_category: BTreeMap<Category, Amount>,
    /// Spending in the bucket, credits excluded.
    pub total: Amount,
    /// "Fuel Reimbursement" amounts received in the bucket. Always zero for the grocery chart.
    pub credits: Amount,
    /// `total - credits`.
    pub net: Amount,
}

impl Bucket {
    fn new(start: NaiveDate) -> Self {
        Self {
            start,
            label: start.format(LABEL_FORMAT).to_string(),
            by_category: BTreeMap::new(),
            total: Amount::ZERO,
            credits: Amount::ZERO,
            net: Amount::ZERO,
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        let category = transaction.category();
        *self.by_category.entry(category.clone()).or_default() += transaction.amount();
        if category.is_credit() {
            self.credits += transaction.amount();
        } else {
            self.total += transaction.amount();
        }
        self.net = self.total - self.credits;
    }
}

/// A chart over a borrowed snapshot.
///
/// Nothing is cached: every call to `buckets` recomputes the series from the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Chart<'a> {
    transactions: &'a Transactions,
    kind: ChartKind,
    period: PeriodSelector,
    today: NaiveDate,
}

impl<'a> Chart<'a> {
    /// A chart whose `current` period resolves against the local clock.
    pub fn new(transactions: &'a Transactions, kind: ChartKind, period: PeriodSelector) -> Self {
        Self::on(transactions, kind, period, period::today())
    }

    pub fn on(
        transactions: &'a Transactions,
        kind: ChartKind,
        period: PeriodSelector,
        today: NaiveDate,
    ) -> Self {
        Self {
            transactions,
            kind,
            period,
            today,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn period(&self) -> PeriodSelector {
        self.period
    }

    /// The buckets in ascending date order.
    ///
    /// With the `recent` selector transactions are cut into Sunday-starting weeks and only the
    /// last `RECENT_WEEKS` weeks that have data are kept. `all` keeps every week. With a month
    /// selector there is one bucket per day that has data in that month.
    pub fn buckets(&self) -> impl Iterator<Item = Bucket> {
        let group = self.kind.group();
        let month = self.period.month_on(self.today);
        let bucketing = self.period.bucketing();

        let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
        for transaction in self.transactions {
            if !transaction.category().is_in(group) {
                continue;
            }
            let Some(date) = transaction.date() else {
                continue;
            };
            if month.is_some_and(|m| !m.contains(date)) {
                continue;
            }
            let key = bucketing.key(date);
            buckets
                .entry(key)
                .or_insert_with(|| Bucket::new(key))
                .add(transaction);
        }

        let skip = match self.period {
            PeriodSelector::Recent => buckets.len().saturating_sub(RECENT_WEEKS),
            _ => 0,
        };
        buckets.into_values().skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::YearMonth;
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn tx(id: &str, category: Category, value: &str, date: &str) -> Transaction {
        Transaction::new(id, id, amount(value), category, date)
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// One car fuel purchase every 5 days for 100 days, starting 2025-05-01.
    fn long_history() -> Transactions {
        (0..20)
            .map(|i| {
                let date = d("2025-05-01") + chrono::Duration::days(i * 5);
                tx(
                    &i.to_string(),
                    Category::CarFuel,
                    "10",
                    &date.format("%Y-%m-%d").to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_recent_keeps_last_eight_weeks_ascending() {
        let transactions = long_history();
        let chart = Chart::on(
            &transactions,
            ChartKind::Car,
            PeriodSelector::Recent,
            d("2025-08-20"),
        );
        let buckets: Vec<Bucket> = chart.buckets().collect();
        assert_eq!(buckets.len(), RECENT_WEEKS);
        for pair in buckets.windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
        // The last purchase is on 2025-08-04, in the week of Sunday 2025-08-03.
        assert_eq!(buckets.last().unwrap().start, d("2025-08-03"));
        assert_eq!(buckets.last().unwrap().label, "3 Aug");
        for bucket in &buckets {
            assert_eq!(period::week_start(bucket.start), bucket.start);
        }
    }

    #[test]
    fn test_all_keeps_every_week() {
        let transactions = long_history();
        let chart = Chart::on(
            &transactions,
            ChartKind::Car,
            PeriodSelector::All,
            d("2025-08-20"),
        );
        let buckets: Vec<Bucket> = chart.buckets().collect();
        assert!(buckets.len() > RECENT_WEEKS);
        assert_eq!(buckets[0].start, d("2025-04-27"));
        let total: Amount = buckets.iter().map(|b| b.total).sum();
        assert_eq!(total, amount("200"));
    }

    #[test]
    fn test_recent_with_few_weeks_keeps_all() {
        let transactions = Transactions::new(vec![
            tx("1", Category::Groceries, "40", "2025-08-04"),
            tx("2", Category::Dining, "15", "2025-08-09"),
            tx("3", Category::SmallShop, "5", "2025-08-10"),
        ]);
        let chart = Chart::on(
            &transactions,
            ChartKind::Grocery,
            PeriodSelector::Recent,
            d("2025-08-20"),
        );
        let buckets: Vec<Bucket> = chart.buckets().collect();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start, d("2025-08-03"));
        assert_eq!(buckets[0].total, amount("55"));
        assert_eq!(buckets[0].by_category[&Category::Groceries], amount("40"));
        assert_eq!(buckets[0].by_category[&Category::Dining], amount("15"));
        assert_eq!(buckets[1].total, amount("5"));
        assert!(buckets[1].credits.is_zero());
        assert_eq!(buckets[1].net, buckets[1].total);
    }

    #[test]
    fn test_month_car_chart_is_daily_and_scoped() {
        let transactions = Transactions::new(vec![
            tx("1", Category::CarFuel, "60", "2025-07-03"),
            tx("2", Category::CarOther, "200", "2025-07-03"),
            tx("3", Category::FuelReimbursement, "25", "2025-07-19"),
            tx("4", Category::CarFuel, "55", "2025-08-01"),
            tx("5", Category::CarFuel, "50", "2025-06-30"),
            tx("6", Category::Groceries, "30", "2025-07-03"),
        ]);
        let july = PeriodSelector::Month(YearMonth::new(2025, 7).unwrap());
        let chart = Chart::on(&transactions, ChartKind::Car, july, d("2025-10-01"));
        let buckets: Vec<Bucket> = chart.buckets().collect();

        assert_eq!(buckets.len(), 2);
        for bucket in &buckets {
            assert!(YearMonth::new(2025, 7).unwrap().contains(bucket.start));
        }

        let third = &buckets[0];
        assert_eq!(third.start, d("2025-07-03"));
        assert_eq!(third.label, "3 Jul");
        assert_eq!(third.total, amount("260"));
        assert_eq!(third.by_category[&Category::CarFuel], amount("60"));
        assert_eq!(third.by_category[&Category::CarOther], amount("200"));
        assert!(!third.by_category.contains_key(&Category::Groceries));

        let nineteenth = &buckets[1];
        assert!(nineteenth.total.is_zero());
        assert_eq!(nineteenth.credits, amount("25"));
        assert_eq!(nineteenth.net, -amount("25"));
    }

    #[test]
    fn test_current_resolves_to_todays_month() {
        let transactions = Transactions::new(vec![
            tx("1", Category::Dining, "12", "2025-08-02"),
            tx("2", Category::Dining, "8", "2025-07-30"),
        ]);
        let chart = Chart::on(
            &transactions,
            ChartKind::Grocery,
            PeriodSelector::Current,
            d("2025-08-15"),
        );
        let buckets: Vec<Bucket> = chart.buckets().collect();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].start, d("2025-08-02"));
    }

    #[test]
    fn test_buckets_are_restartable() {
        let transactions = long_history();
        let chart = Chart::on(
            &transactions,
            ChartKind::Car,
            PeriodSelector::Recent,
            d("2025-08-20"),
        );
        let first: Vec<Bucket> = chart.buckets().collect();
        let second: Vec<Bucket> = chart.buckets().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreadable_dates_are_skipped() {
        let transactions = Transactions::new(vec![
            tx("1", Category::CarFuel, "10", "2025-08-02"),
            tx("2", Category::CarFuel, "10", "last tuesday"),
        ]);
        let chart = Chart::on(
            &transactions,
            ChartKind::Car,
            PeriodSelector::Recent,
            d("2025-08-20"),
        );
        let total: Amount = chart.buckets().map(|b| b.total).sum();
        assert_eq!(total, amount("10"));
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!("car".parse::<ChartKind>().unwrap(), ChartKind::Car);
        assert_eq!(ChartKind::Grocery.to_string(), "grocery");
    }
}
