//! Read-only reports over the current collection: summary, breakdown, chart and compare.

use crate::aggregate::{
    breakdown as category_breakdown, CategoryTotal, Comparison, Figures, Summary,
};
use crate::args::{ChartArgs, CompareArgs, PeriodArgs};
use crate::chart::{Bucket, Chart, ChartKind};
use crate::commands::{open_ledger, plural, Out};
use crate::model::{Amount, Category};
use crate::{aggregate, period, Config, Mode, Result};

/// Overall, car, grocery and housing figures for a period.
pub async fn summary(config: Config, mode: Mode, args: PeriodArgs) -> Result<Out<Summary>> {
    let ledger = open_ledger(&config, mode).await?;
    let summary = Summary::new(ledger.transactions(), args.period());
    let message = render_summary(&summary, config.currency_symbol());
    Ok(Out::new(message, summary))
}

/// Totals per category for a period.
pub async fn breakdown(
    config: Config,
    mode: Mode,
    args: PeriodArgs,
) -> Result<Out<Vec<CategoryTotal>>> {
    let ledger = open_ledger(&config, mode).await?;
    let today = period::today();
    let rows = category_breakdown(aggregate::in_period(
        ledger.transactions(),
        args.period(),
        today,
    ));

    let c = config.currency_symbol();
    let mut message = format!("Breakdown for {}", args.period());
    if rows.is_empty() {
        message.push_str("\n  No expenses");
    }
    for row in &rows {
        message.push_str(&format!(
            "\n  {:<22}{:>6}  {:>14}  {:>14}  {:>14}{}",
            row.category.as_str(),
            row.count,
            row.total.format(c),
            row.reimbursements.format(c),
            row.net.format(c),
            if row.is_credit { "  (credit)" } else { "" }
        ));
    }
    Ok(Out::new(message, rows))
}

/// The bucket series behind the car or grocery chart.
pub async fn chart(config: Config, mode: Mode, args: ChartArgs) -> Result<Out<Vec<Bucket>>> {
    let ledger = open_ledger(&config, mode).await?;
    let chart = Chart::new(ledger.transactions(), args.kind(), args.period());
    let buckets: Vec<Bucket> = chart.buckets().collect();

    let c = config.currency_symbol();
    let mut message = format!(
        "{} chart for {} ({})",
        match chart.kind() {
            ChartKind::Car => "Car",
            ChartKind::Grocery => "Grocery",
        },
        chart.period(),
        plural(buckets.len(), "bucket")
    );
    for bucket in &buckets {
        let line = match chart.kind() {
            ChartKind::Car => format!(
                "\n  {:<8}  fuel {:>12}  other {:>12}  total {:>12}  reimbursed {:>12}  net {:>12}",
                bucket.label,
                part(bucket, &Category::CarFuel).format(c),
                part(bucket, &Category::CarOther).format(c),
                bucket.total.format(c),
                bucket.credits.format(c),
                bucket.net.format(c),
            ),
            ChartKind::Grocery => format!(
                "\n  {:<8}  groceries {:>12}  dining {:>12}  small shop {:>12}  total {:>12}",
                bucket.label,
                part(bucket, &Category::Groceries).format(c),
                part(bucket, &Category::Dining).format(c),
                part(bucket, &Category::SmallShop).format(c),
                bucket.total.format(c),
            ),
        };
        message.push_str(&line);
    }
    Ok(Out::new(message, buckets))
}

/// The same figures for two periods and their difference.
pub async fn compare(config: Config, mode: Mode, args: CompareArgs) -> Result<Out<Comparison>> {
    let ledger = open_ledger(&config, mode).await?;
    let comparison = Comparison::new(ledger.transactions(), args.a(), args.b());

    let c = config.currency_symbol();
    let a = comparison.a.figures();
    let b = comparison.b.figures();
    let d = comparison.difference;
    let mut message = format!(
        "{:<26}{:>14}  {:>14}  {:>14}",
        "Comparison",
        comparison.a.period.to_string(),
        comparison.b.period.to_string(),
        "difference"
    );
    message.push_str(&format!(
        "\n  {:<24}{:>14}  {:>14}  {:>14}",
        "Expenses", a.count, b.count, d.count
    ));
    for (label, pick) in FIGURE_ROWS {
        message.push_str(&format!(
            "\n  {:<24}{:>14}  {:>14}  {:>14}",
            label,
            pick(&a).format(c),
            pick(&b).format(c),
            pick(&d).format(c)
        ));
    }
    Ok(Out::new(message, comparison))
}

type Pick = fn(&Figures) -> Amount;

const FIGURE_ROWS: [(&str, Pick); 11] = [
    ("Total", |f| f.total),
    ("Reimbursements", |f| f.reimbursements),
    ("Net", |f| f.net),
    ("Car total", |f| f.car_total),
    ("Car reimbursed", |f| f.car_reimbursements_received),
    ("Car net", |f| f.car_net),
    ("Grocery total", |f| f.grocery_total),
    ("Groceries", |f| f.groceries),
    ("Dining", |f| f.dining),
    ("Small shop", |f| f.small_shop),
    ("Housing total", |f| f.housing_total),
];

fn part(bucket: &Bucket, category: &Category) -> Amount {
    bucket
        .by_category
        .get(category)
        .copied()
        .unwrap_or_default()
}

fn render_summary(s: &Summary, c: &str) -> String {
    let row = |label: &str, amount: Amount| format!("\n  {label:<24}{:>14}", amount.format(c));
    let mut out = format!("Summary for {} ({})", s.period, plural(s.count, "expense"));
    out.push_str(&row("Total", s.overall.total));
    out.push_str(&row("Reimbursements", s.overall.reimbursements));
    out.push_str(&row("Net", s.overall.net));

    out.push_str("\nCar");
    out.push_str(&row("Fuel", s.car.fuel_spent));
    out.push_str(&row("Total", s.car.total));
    out.push_str(&row("Reimbursed on expenses", s.car.reimbursements));
    out.push_str(&row("Fuel reimbursements", s.car.fuel_reimbursements));
    out.push_str(&row("Reimbursements received", s.car.reimbursements_received));
    out.push_str(&row("Net", s.car.net));

    out.push_str("\nGrocery");
    out.push_str(&row("Groceries", s.grocery.groceries));
    out.push_str(&row("Dining", s.grocery.dining));
    out.push_str(&row("Small shop", s.grocery.small_shop));
    out.push_str(&row("Total", s.grocery.total));
    out.push_str(&row("This week", s.grocery_this_week));

    out.push_str("\nHousing");
    out.push_str(&row("Rent and council tax", s.housing.rent_and_council_tax));
    out.push_str(&row("Utilities", s.housing.utilities));
    out.push_str(&row("Internet", s.housing.internet));
    out.push_str(&row("Total", s.housing.total));

    out.push_str("\nAll time");
    out.push_str(&row("Total", s.all_time.total));
    out.push_str(&row("Reimbursements", s.all_time.reimbursements));
    out.push_str(&row("Net", s.all_time.net));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transaction;
    use crate::period::{PeriodSelector, YearMonth};
    use crate::test::TestEnv;
    use std::str::FromStr;

    fn month(m: u32) -> PeriodSelector {
        PeriodSelector::Month(YearMonth::new(2025, m).unwrap())
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        let out = summary(env.config(), Mode::Test, PeriodArgs::new(month(8)))
            .await
            .unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.count, 6);
        assert_eq!(s.overall.total, amount("1263.70"));
        assert_eq!(s.overall.reimbursements, amount("30"));
        assert_eq!(s.overall.net, amount("1143.70"));
        assert_eq!(s.car.reimbursements_received, amount("75"));
        assert_eq!(s.car.net, amount("-2.85"));
        assert_eq!(s.grocery.total, amount("96.55"));
        assert_eq!(s.housing.total, amount("1050"));
        assert!(out.message().starts_with("Summary for 2025-08 (6 expenses)"));
        assert!(out.message().contains("£1,263.70"));
        assert!(out.message().contains("-£2.85"));
    }

    #[tokio::test]
    async fn test_summary_after_delete() {
        let env = TestEnv::new().await;
        let mut state = env.get_state();
        state.remove("seed-0007");
        env.set_state(state);
        let out = summary(env.config(), Mode::Test, PeriodArgs::new(month(8)))
            .await
            .unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.overall.total, amount("213.70"));
        assert!(s.housing.total.is_zero());
    }

    #[tokio::test]
    async fn test_breakdown() {
        let env = TestEnv::new().await;
        let out = breakdown(env.config(), Mode::Test, PeriodArgs::new(month(8)))
            .await
            .unwrap();
        let rows = out.structure().unwrap();
        let categories: Vec<&Category> = rows.iter().map(|r| &r.category).collect();
        assert_eq!(
            categories,
            vec![
                &Category::Groceries,
                &Category::Dining,
                &Category::SmallShop,
                &Category::CarFuel,
                &Category::FuelReimbursement,
                &Category::RentAndCouncilTax,
            ]
        );
        let fuel = &rows[3];
        assert_eq!(fuel.net, amount("42.15"));
        assert!(out.message().contains("(credit)"));
    }

    #[tokio::test]
    async fn test_summary_all_time() {
        let env = TestEnv::new().await;
        let mut state = env.get_state();
        state.prepend(Transaction::new(
            "undated",
            "Farm shop",
            amount("10"),
            Category::Groceries,
            "",
        ));
        env.set_state(state);

        let out = summary(env.config(), Mode::Test, PeriodArgs::new(PeriodSelector::All))
            .await
            .unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.count, 13);
        assert_eq!(s.overall, s.all_time);
        assert_eq!(s.overall.total, amount("1785.12"));
        assert_eq!(s.car.total, amount("381.05"));
        assert_eq!(s.car.reimbursements_received, amount("195"));
        assert_eq!(s.car.net, amount("186.05"));
        assert_eq!(s.grocery.total, amount("180.67"));
        assert_eq!(s.housing.total, amount("1178.40"));
        assert!(out.message().starts_with("Summary for all (13 expenses)"));
    }

    #[tokio::test]
    async fn test_breakdown_all_time() {
        let env = TestEnv::new().await;
        let out = breakdown(env.config(), Mode::Test, PeriodArgs::new(PeriodSelector::All))
            .await
            .unwrap();
        let rows = out.structure().unwrap();
        assert_eq!(rows.len(), Category::ALL.len());
        let counted: usize = rows.iter().map(|r| r.count).sum();
        assert_eq!(counted, 12);
        let fuel = rows.iter().find(|r| r.category == Category::CarFuel).unwrap();
        assert_eq!(fuel.count, 2);
        assert_eq!(fuel.total, amount("141.05"));
        assert_eq!(fuel.net, amount("111.05"));
        let maintenance = rows.iter().find(|r| r.category == Category::CarOther).unwrap();
        assert_eq!(maintenance.net, amount("120"));
        assert!(out.message().starts_with("Breakdown for all"));
    }

    #[tokio::test]
    async fn test_car_chart_all_keeps_old_weeks() {
        let env = TestEnv::new().await;
        let mut state = env.get_state();
        state.prepend(Transaction::new(
            "old-fuel",
            "Fuel last year",
            amount("50"),
            Category::CarFuel,
            "2024-01-10",
        ));
        env.set_state(state);

        let all = chart(
            env.config(),
            Mode::Test,
            ChartArgs::new(ChartKind::Car, PeriodSelector::All),
        )
        .await
        .unwrap();
        let buckets = all.structure().unwrap();
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].label, "7 Jan");
        assert_eq!(buckets[0].total, amount("50"));
        let spent: Amount = buckets.iter().map(|b| b.total).sum();
        assert_eq!(spent, amount("431.05"));
        assert!(all.message().starts_with("Car chart for all (4 buckets)"));
    }

    #[tokio::test]
    async fn test_grocery_chart_for_month() {
        let env = TestEnv::new().await;
        let out = chart(
            env.config(),
            Mode::Test,
            ChartArgs::new(ChartKind::Grocery, month(8)),
        )
        .await
        .unwrap();
        let buckets = out.structure().unwrap();
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2 Aug", "5 Aug", "9 Aug"]);
        assert!(out.message().starts_with("Grocery chart for 2025-08 (3 buckets)"));
    }

    #[tokio::test]
    async fn test_car_chart_recent() {
        let env = TestEnv::new().await;
        let out = chart(
            env.config(),
            Mode::Test,
            ChartArgs::new(ChartKind::Car, PeriodSelector::Recent),
        )
        .await
        .unwrap();
        let buckets = out.structure().unwrap();
        assert_eq!(buckets.len(), 3);
        let last = buckets.last().unwrap();
        assert_eq!(last.label, "3 Aug");
        assert_eq!(last.total, amount("72.15"));
        assert_eq!(last.credits, amount("45"));
        assert_eq!(last.net, amount("27.15"));
    }

    #[tokio::test]
    async fn test_compare() {
        let env = TestEnv::new().await;
        let out = compare(
            env.config(),
            Mode::Test,
            CompareArgs::new(month(8), month(7)),
        )
        .await
        .unwrap();
        let comparison = out.structure().unwrap();
        assert_eq!(comparison.b.overall.total, amount("511.42"));
        assert_eq!(comparison.difference.total, amount("752.28"));
        assert_eq!(comparison.difference.car_net, amount("-191.75"));
        assert_eq!(comparison.difference.count, 0);
        assert!(out.message().contains("-£191.75"));
    }
}
