//! Pure reductions of a transaction collection into summary figures.
//!
//! Reimbursement reaches the net figures through two independent channels: a transaction's own
//! `reimbursement_amount`, and separate "Fuel Reimbursement" transactions whose amount is a credit.
//! Both reduce net.
//!
//! Transactions with an unknown category count towards `total`, `reimbursements` and `net` but
//! towards no category or group figure. Transactions with an unreadable date are left out of every
//! period-scoped figure.

use crate::model::{Amount, Category, CategoryGroup, Transaction, Transactions};
use crate::period::{self, week_start, PeriodSelector};
use chrono::NaiveDate;
use serde::Serialize;
use std::ops::Sub;

/// Sum of `amount` over all given transactions.
pub fn total<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Amount {
    transactions.into_iter().map(Transaction::amount).sum()
}

/// Sum of `reimbursement_amount` over all given transactions.
pub fn reimbursements<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Amount {
    transactions
        .into_iter()
        .map(Transaction::reimbursement_amount)
        .sum()
}

/// The net expense: spending minus "Fuel Reimbursement" credits minus every reimbursement amount.
pub fn net<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Amount {
    transactions
        .into_iter()
        .map(|t| {
            let signed = if t.category().is_credit() {
                -t.amount()
            } else {
                t.amount()
            };
            signed - t.reimbursement_amount()
        })
        .sum()
}

/// Sum of `amount` over the transactions in `category`.
pub fn category_total<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    category: &Category,
) -> Amount {
    total(
        transactions
            .into_iter()
            .filter(|t| t.category() == category),
    )
}

/// The transactions whose date falls in `period`, judged as if today were `today`. Only `all`
/// takes transactions whose date cannot be read.
pub fn in_period<'a>(
    transactions: &'a Transactions,
    period: PeriodSelector,
    today: NaiveDate,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |t| {
        period.is_all() || t.date().is_some_and(|d| period.matches_on(d, today))
    })
}

/// Total, reimbursements and net over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total: Amount,
    pub reimbursements: Amount,
    pub net: Amount,
}

impl Totals {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction> + Clone) -> Self {
        Self {
            total: total(transactions.clone()),
            reimbursements: reimbursements(transactions.clone()),
            net: net(transactions),
        }
    }
}

/// Car spending net of both reimbursement channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CarSummary {
    /// "Car - Fuel" spending alone.
    pub fuel_spent: Amount,
    /// "Car - Fuel" plus "Car - Maintenance" spending.
    pub total: Amount,
    /// Reimbursement amounts recorded on car spending.
    pub reimbursements: Amount,
    /// Amounts of "Fuel Reimbursement" transactions.
    pub fuel_reimbursements: Amount,
    /// `reimbursements + fuel_reimbursements`.
    pub reimbursements_received: Amount,
    /// `total - reimbursements - fuel_reimbursements`.
    pub net: Amount,
}

impl CarSummary {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = CarSummary::default();
        for t in transactions {
            match t.category() {
                Category::CarFuel | Category::CarOther => {
                    if t.category() == &Category::CarFuel {
                        summary.fuel_spent += t.amount();
                    }
                    summary.total += t.amount();
                    summary.reimbursements += t.reimbursement_amount();
                }
                Category::FuelReimbursement => summary.fuel_reimbursements += t.amount(),
                _ => {}
            }
        }
        summary.reimbursements_received = summary.reimbursements + summary.fuel_reimbursements;
        summary.net = summary.total - summary.reimbursements - summary.fuel_reimbursements;
        summary
    }
}

/// Groceries, dining and small shop spending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrocerySummary {
    pub groceries: Amount,
    pub dining: Amount,
    pub small_shop: Amount,
    pub total: Amount,
}

impl GrocerySummary {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = GrocerySummary::default();
        for t in transactions {
            let slot = match t.category() {
                Category::Groceries => &mut summary.groceries,
                Category::Dining => &mut summary.dining,
                Category::SmallShop => &mut summary.small_shop,
                _ => continue,
            };
            *slot += t.amount();
            summary.total += t.amount();
        }
        summary
    }
}

/// Rent, council tax and bills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HousingSummary {
    pub rent_and_council_tax: Amount,
    pub utilities: Amount,
    pub internet: Amount,
    pub total: Amount,
}

impl HousingSummary {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = HousingSummary::default();
        for t in transactions {
            let slot = match t.category() {
                Category::RentAndCouncilTax => &mut summary.rent_and_council_tax,
                Category::Utilities => &mut summary.utilities,
                Category::Internet => &mut summary.internet,
                _ => continue,
            };
            *slot += t.amount();
            summary.total += t.amount();
        }
        summary
    }
}

/// One row of the per-category breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub group: CategoryGroup,
    pub total: Amount,
    pub reimbursements: Amount,
    /// `total - reimbursements`, except for credit categories where it is the total itself.
    pub net: Amount,
    pub count: usize,
    pub is_credit: bool,
}

/// Per-category totals for every known category that has at least one transaction, in
/// `Category::ALL` order.
pub fn breakdown<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategoryTotal> {
    let transactions: Vec<&Transaction> = transactions.into_iter().collect();
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let matching: Vec<&Transaction> = transactions
                .iter()
                .copied()
                .filter(|t| t.category() == &category)
                .collect();
            if matching.is_empty() {
                return None;
            }
            let total = total(matching.iter().copied());
            let reimbursements = reimbursements(matching.iter().copied());
            let is_credit = category.is_credit();
            let group = category.group()?;
            Some(CategoryTotal {
                net: if is_credit {
                    total
                } else {
                    total - reimbursements
                },
                category,
                group,
                total,
                reimbursements,
                count: matching.len(),
                is_credit,
            })
        })
        .collect()
}

/// Every derived figure for one period, computed from an immutable snapshot of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub period: PeriodSelector,
    /// The date the period was evaluated against.
    pub today: NaiveDate,
    /// Number of transactions in the period.
    pub count: usize,
    /// Overall figures for the period.
    pub overall: Totals,
    /// Overall figures across every transaction, regardless of date.
    pub all_time: Totals,
    pub car: CarSummary,
    pub grocery: GrocerySummary,
    /// Grocery-group spending since the Sunday that starts the current week.
    pub grocery_this_week: Amount,
    pub housing: HousingSummary,
}

impl Summary {
    /// Computes the summary against the local clock.
    pub fn new(transactions: &Transactions, period: PeriodSelector) -> Self {
        Self::on(transactions, period, period::today())
    }

    /// Computes the summary as if today were `today`.
    pub fn on(transactions: &Transactions, period: PeriodSelector, today: NaiveDate) -> Self {
        let scoped: Vec<&Transaction> = in_period(transactions, period, today).collect();
        let this_week = week_start(today);
        let grocery_this_week = total(
            transactions
                .iter()
                .filter(|t| t.category().is_in(CategoryGroup::Grocery))
                .filter(|t| t.date().is_some_and(|d| d >= this_week)),
        );

        Self {
            period,
            today,
            count: scoped.len(),
            overall: Totals::of(scoped.iter().copied()),
            all_time: Totals::of(transactions.iter()),
            car: CarSummary::of(scoped.iter().copied()),
            grocery: GrocerySummary::of(scoped.iter().copied()),
            grocery_this_week,
            housing: HousingSummary::of(scoped.iter().copied()),
        }
    }

    /// The period-scoped figures that can be compared across periods.
    pub fn figures(&self) -> Figures {
        Figures {
            count: self.count as i64,
            total: self.overall.total,
            reimbursements: self.overall.reimbursements,
            net: self.overall.net,
            car_total: self.car.total,
            car_reimbursements_received: self.car.reimbursements_received,
            car_net: self.car.net,
            grocery_total: self.grocery.total,
            groceries: self.grocery.groceries,
            dining: self.grocery.dining,
            small_shop: self.grocery.small_shop,
            housing_total: self.housing.total,
        }
    }
}

/// A flat set of period figures. Subtracting two of them gives the signed per-figure difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Figures {
    pub count: i64,
    pub total: Amount,
    pub reimbursements: Amount,
    pub net: Amount,
    pub car_total: Amount,
    pub car_reimbursements_received: Amount,
    pub car_net: Amount,
    pub grocery_total: Amount,
    pub groceries: Amount,
    pub dining: Amount,
    pub small_shop: Amount,
    pub housing_total: Amount,
}

impl Sub for Figures {
    type Output = Figures;

    fn sub(self, rhs: Figures) -> Figures {
        Figures {
            count: self.count - rhs.count,
            total: self.total - rhs.total,
            reimbursements: self.reimbursements - rhs.reimbursements,
            net: self.net - rhs.net,
            car_total: self.car_total - rhs.car_total,
            car_reimbursements_received: self.car_reimbursements_received
                - rhs.car_reimbursements_received,
            car_net: self.car_net - rhs.car_net,
            grocery_total: self.grocery_total - rhs.grocery_total,
            groceries: self.groceries - rhs.groceries,
            dining: self.dining - rhs.dining,
            small_shop: self.small_shop - rhs.small_shop,
            housing_total: self.housing_total - rhs.housing_total,
        }
    }
}

/// The same figures for two periods and their difference, `a - b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub a: Summary,
    pub b: Summary,
    pub difference: Figures,
}

impl Comparison {
    pub fn new(transactions: &Transactions, a: PeriodSelector, b: PeriodSelector) -> Self {
        Self::on(transactions, a, b, period::today())
    }

    pub fn on(
        transactions: &Transactions,
        a: PeriodSelector,
        b: PeriodSelector,
        today: NaiveDate,
    ) -> Self {
        let a = Summary::on(transactions, a, today);
        let b = Summary::on(transactions, b, today);
        let difference = a.figures() - b.figures();
        Self { a, b, difference }
    }
}
