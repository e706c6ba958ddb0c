//! These structs provide the CLI interface for the expenses CLI.

use crate::chart::ChartKind;
use crate::period::PeriodSelector;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line client for a personal expense tracker.
///
/// Records dated, categorised expenses in an expense store served over HTTP and derives totals,
/// net-of-reimbursement figures, per-category breakdowns, chart series and period comparisons from
/// them.
///
/// Periods are written as 'current' (this calendar month), 'recent' (the last 8 weeks, starting on
/// Sundays), 'all' (every expense, undated ones included) or a month such as '2025-07'.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. Pass the base URL of the expense store as
    /// --api-url, records are then read and written at {api-url}/api/expenses.
    Init(InitArgs),
    /// List expenses, newest first.
    List(ListArgs),
    /// Add an expense.
    Add(AddArgs),
    /// Delete an expense by id.
    Delete(DeleteArgs),
    /// Show overall, car, grocery and housing figures for a period.
    Summary(PeriodArgs),
    /// Show totals per category for a period.
    Breakdown(PeriodArgs),
    /// Show the weekly or daily series behind the car or grocery chart.
    Chart(ChartArgs),
    /// Compare the figures of two periods.
    Compare(CompareArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// Args for the `expenses init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the expense store, e.g. http://localhost:5000
    #[arg(long)]
    api_url: String,

    /// The currency symbol amounts are printed with. Defaults to £
    #[arg(long)]
    currency: Option<String>,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, currency: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            currency,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// Args for the `expenses list` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    /// Only list expenses in this period. All expenses are listed when omitted.
    #[arg(long)]
    period: Option<PeriodSelector>,
}

impl ListArgs {
    pub fn new(period: Option<PeriodSelector>) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Option<PeriodSelector> {
        self.period
    }
}

/// Args for the `expenses add` command.
///
/// Description, amount and category are required. Nothing is sent to the store if any of them is
/// empty, or if the amount is not a number, or if the category is not one of: Groceries, Dining,
/// Small Shop, Car - Fuel, Car - Maintenance, Fuel Reimbursement, Rent and Council Tax,
/// Utilities, Internet.
#[derive(Debug, Default, Parser, Clone)]
pub struct AddArgs {
    /// What the expense was for.
    #[arg(long)]
    description: String,

    /// The amount spent, e.g. 12.50
    #[arg(long)]
    amount: String,

    /// The category, e.g. "Car - Fuel".
    #[arg(long)]
    category: String,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Mark the expense as work-related. Only applies to car categories.
    #[arg(long)]
    reimbursable: bool,

    /// The part of the amount that will be paid back. Only applies with --reimbursable.
    #[arg(long, requires = "reimbursable")]
    reimbursement_amount: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_reimbursement(mut self, reimbursement_amount: impl Into<String>) -> Self {
        self.reimbursable = true;
        self.reimbursement_amount = Some(reimbursement_amount.into());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn reimbursable(&self) -> bool {
        self.reimbursable
    }

    pub fn reimbursement_amount(&self) -> Option<&str> {
        self.reimbursement_amount.as_deref()
    }
}

/// Args for the `expenses delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the expense to delete, as shown by `expenses list`.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for commands that report on a single period.
#[derive(Debug, Default, Parser, Clone)]
pub struct PeriodArgs {
    /// 'current', 'recent', 'all' or YYYY-MM.
    #[arg(long, default_value_t = PeriodSelector::Current)]
    period: PeriodSelector,
}

impl PeriodArgs {
    pub fn new(period: PeriodSelector) -> Self {
        Self { period }
    }

    pub fn period(&self) -> PeriodSelector {
        self.period
    }
}

/// Args for the `expenses chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Which chart to show.
    #[arg(value_enum)]
    kind: ChartKind,

    /// 'recent' for weekly buckets over the last 8 weeks, 'all' for every week, or 'current' or
    /// YYYY-MM for daily buckets within a month.
    #[arg(long, default_value_t = PeriodSelector::Recent)]
    period: PeriodSelector,
}

impl ChartArgs {
    pub fn new(kind: ChartKind, period: PeriodSelector) -> Self {
        Self { kind, period }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn period(&self) -> PeriodSelector {
        self.period
    }
}

/// Args for the `expenses compare` command.
#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    /// The period to compare.
    a: PeriodSelector,

    /// The period to compare against. Differences are shown as A minus B.
    b: PeriodSelector,
}

impl CompareArgs {
    pub fn new(a: PeriodSelector, b: PeriodSelector) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> PeriodSelector {
        self.a
    }

    pub fn b(&self) -> PeriodSelector {
        self.b
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default expenses home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
