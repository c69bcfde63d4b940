//! These structs provide the CLI interface for the expenses CLI.

use crate::filter::{CategoryFilter, SortKey};
use crate::model::RecordId;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: record, search and total your income and spending.
///
/// Every entry has a description, a signed amount (negative for an expense, positive for income),
/// an optional date and an optional category. Entries are kept as JSON in the expenses home
/// directory.
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
    /// Create the home directory and the configuration file.
    ///
    /// Run this once before anything else. The home directory defaults to $HOME/expenses; pass
    /// --home or set EXPENSES_HOME to keep it somewhere else.
    Init,
    /// Record a new income or expense entry.
    Add(AddArgs),
    /// Change an existing entry. Fields that are not given keep their current value.
    Edit(EditArgs),
    /// Delete an entry.
    Delete(DeleteArgs),
    /// Show entries matching the given filters, followed by the totals of all entries.
    List(ListArgs),
    /// Show the balance, income and expense totals of all entries.
    Summary,
    /// Show the categories in use.
    Categories,
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

    /// The directory where entries and configuration are held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `expenses add` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct AddArgs {
    /// What the entry is for, e.g. "Lunch".
    #[arg(long, short)]
    description: String,

    /// Negative for an expense, positive for income, e.g. -15.50 or 2,000.
    #[arg(long, short, allow_hyphen_values = true)]
    amount: String,

    /// The date of the entry as YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,

    /// A free-text category, e.g. "Food".
    #[arg(long, short)]
    category: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        date: Option<&str>,
        category: Option<&str>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            date: date.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Args for the `expenses edit` command.
#[derive(Debug, ClapArgs, Clone, Default)]
pub struct EditArgs {
    /// The id of the entry, as shown by `expenses list`.
    id: RecordId,

    #[arg(long, short)]
    description: Option<String>,

    #[arg(long, short, allow_hyphen_values = true)]
    amount: Option<String>,

    /// The new date as YYYY-MM-DD.
    #[arg(long, conflicts_with = "no_date")]
    date: Option<String>,

    /// Remove the date.
    #[arg(long)]
    no_date: bool,

    #[arg(long, short, conflicts_with = "no_category")]
    category: Option<String>,

    /// Remove the category.
    #[arg(long)]
    no_category: bool,
}

impl EditArgs {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn clear_date(mut self) -> Self {
        self.no_date = true;
        self
    }

    pub fn clear_category(mut self) -> Self {
        self.no_category = true;
        self
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn no_date(&self) -> bool {
        self.no_date
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn no_category(&self) -> bool {
        self.no_category
    }
}

/// Args for the `expenses delete` command.
#[derive(Debug, ClapArgs, Clone)]
pub struct DeleteArgs {
    /// The id of the entry, as shown by `expenses list`.
    id: RecordId,
}

impl DeleteArgs {
    pub fn new(id: RecordId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }
}

/// The date-range selector for `expenses list`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Range {
    #[default]
    All,
    Today,
    /// Sunday through Saturday of the current week.
    Week,
    /// The current calendar month.
    Month,
    /// Between --from and --to, inclusive.
    Custom,
}

serde_plain::derive_display_from_serialize!(Range);
serde_plain::derive_fromstr_from_deserialize!(Range);

/// How `expenses list` prints the entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Table,
    Json,
    Csv,
}

serde_plain::derive_display_from_serialize!(Format);
serde_plain::derive_fromstr_from_deserialize!(Format);

/// Args for the `expenses list` command.
#[derive(Debug, ClapArgs, Clone, Default)]
pub struct ListArgs {
    /// Only show entries whose description or category contains this text, ignoring case.
    #[arg(long, short)]
    search: Option<String>,

    /// "all", "uncategorized", or a category name (case-sensitive).
    #[arg(long, short, default_value_t = CategoryFilter::All)]
    category: CategoryFilter,

    #[arg(long, short, default_value_t = Range::All)]
    range: Range,

    /// First day of a custom range, YYYY-MM-DD.
    #[arg(long)]
    from: Option<String>,

    /// Last day of a custom range, YYYY-MM-DD.
    #[arg(long)]
    to: Option<String>,

    /// Defaults to the `default_sort` setting in config.json.
    #[arg(long)]
    sort: Option<SortKey>,

    #[arg(long, short, default_value_t = Format::Table)]
    format: Format,
}

impl ListArgs {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    pub fn with_custom_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.range = Range::Custom;
        self.from = from.map(str::to_string);
        self.to = to.map(str::to_string);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or EXPENSES_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
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
    pub fn path(&self) -> &Path {
        &self.0
    }
}
