//! The `list` command: filter, sort and print records.

use crate::args::{Format, ListArgs, Range};
use crate::commands::{plural, Out};
use crate::filter::{view, Criteria, DateFilter};
use crate::model::{parse_date, Record};
use crate::summary::{summarize, Summary};
use crate::{Config, Error};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

/// The records shown by `list` along with the totals of every record.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub records: Vec<Record>,
    pub summary: Summary,
}

/// Shows the records that match `args`. `today` anchors the today, week and month ranges.
///
/// The totals in the returned `Listing` always cover every record, not only the visible ones.
///
/// # Errors
/// - Returns an error if a custom range is missing a bound, has an unparseable bound, or starts
///   after it ends. Nothing is listed in that case.
/// - Returns an error if the totals are too large to compute.
pub fn list(config: &Config, args: &ListArgs, today: NaiveDate) -> Result<Out<Listing>> {
    let criteria = criteria(config, args)?;
    criteria.validate().map_err(Error::from)?;

    let store = config.open_store()?;
    let records = view(store.list(), &criteria, today);
    let summary = summarize(store.list())?;
    let symbol = config.currency_symbol();

    let report = match args.format() {
        Format::Table => format!(
            "{}\n{}",
            render_table(&records, symbol),
            totals_line(&summary, symbol)
        ),
        Format::Json => {
            serde_json::to_string_pretty(&records).context("Unable to serialize records")?
        }
        Format::Csv => render_csv(&records)?,
    };

    let message = format!(
        "Showing {} of {} record{}",
        records.len(),
        summary.count,
        plural(summary.count)
    );
    Ok(Out::new(message, Listing { records, summary }).with_report(report))
}

fn criteria(config: &Config, args: &ListArgs) -> Result<Criteria> {
    if args.range() != Range::Custom && (args.from().is_some() || args.to().is_some()) {
        warn!("--from and --to are ignored unless --range is custom");
    }
    let date = match args.range() {
        Range::All => DateFilter::All,
        Range::Today => DateFilter::Today,
        Range::Week => DateFilter::Week,
        Range::Month => DateFilter::Month,
        Range::Custom => DateFilter::Custom {
            from: bound(args.from())?,
            to: bound(args.to())?,
        },
    };
    Ok(Criteria {
        search: args.search().unwrap_or_default().to_string(),
        category: args.category().clone(),
        date,
        sort: args.sort().unwrap_or_else(|| config.default_sort()),
    })
}

fn bound(value: Option<&str>) -> Result<Option<NaiveDate>> {
    let parsed = value.map(parse_date).transpose().map_err(Error::from)?;
    Ok(parsed.flatten())
}

/// Renders `records` as an aligned text table.
pub(crate) fn render_table(records: &[Record], symbol: &str) -> String {
    if records.is_empty() {
        return "No records match.".to_string();
    }
    let header = ["ID", "Date", "Description", "Category", "Amount"].map(String::from);
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.id().to_string(),
                r.date().map(|d| d.to_string()).unwrap_or_default(),
                r.description().to_string(),
                r.category().unwrap_or_default().to_string(),
                r.amount().display_with(symbol),
            ]
        })
        .collect();

    let mut widths = [0usize; 5];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| format_row(row, &widths))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_row(row: &[String; 5], widths: &[usize; 5]) -> String {
    let [id, date, description, category, amount] = row;
    format!(
        "{id:<w0$}  {date:<w1$}  {description:<w2$}  {category:<w3$}  {amount:>w4$}",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    )
    .trim_end()
    .to_string()
}

pub(crate) fn totals_line(summary: &Summary, symbol: &str) -> String {
    format!(
        "Balance: {}  Income: {}  Expense: {}",
        summary.balance.display_with(symbol),
        summary.income.display_with(symbol),
        summary.expense.display_with(symbol)
    )
}

fn render_csv(records: &[Record]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "date", "description", "category", "amount"])?;
    for record in records {
        writer.write_record([
            record.id().to_string(),
            record.date().map(|d| d.to_string()).unwrap_or_default(),
            record.description().to_string(),
            record.category().unwrap_or_default().to_string(),
            record.amount().value().to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to finish writing CSV: {e}"))?;
    let text = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
    Ok(text.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::filter::{CategoryFilter, SortKey};
    use crate::model::Amount;
    use crate::test::TestEnv;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    async fn scenario() -> (TestEnv, Record, Record) {
        let env = TestEnv::new().await;
        let lunch = env.insert("Lunch", -15, Some("2026-02-09"), Some("Food"));
        let salary = env.insert("Salary", 2000, Some("2026-02-01"), Some("Income"));
        (env, lunch, salary)
    }

    fn descriptions(out: &Out<Listing>) -> Vec<&str> {
        out.structure()
            .unwrap()
            .records
            .iter()
            .map(Record::description)
            .collect()
    }

    #[tokio::test]
    async fn test_list_default_sort_is_newest_first() {
        let (env, _, _) = scenario().await;
        let out = list(env.config(), &ListArgs::default(), today()).unwrap();
        assert_eq!(descriptions(&out), vec!["Lunch", "Salary"]);
        assert_eq!(out.message(), "Showing 2 of 2 records");

        let summary = out.structure().unwrap().summary;
        assert_eq!(summary.balance, Amount::from(1985));
        assert_eq!(summary.income, Amount::from(2000));
        assert_eq!(summary.expense, Amount::from(-15));
    }

    #[tokio::test]
    async fn test_list_search_and_category() {
        let (env, _, _) = scenario().await;
        let args = ListArgs::default().with_search("LUN");
        let out = list(env.config(), &args, today()).unwrap();
        assert_eq!(descriptions(&out), vec!["Lunch"]);

        let args = ListArgs::default().with_category(CategoryFilter::Named("Income".into()));
        let out = list(env.config(), &args, today()).unwrap();
        assert_eq!(descriptions(&out), vec!["Salary"]);
    }

    #[tokio::test]
    async fn test_list_totals_ignore_filters() {
        let (env, _, _) = scenario().await;
        let args = ListArgs::default().with_search("nothing matches this");
        let out = list(env.config(), &args, today()).unwrap();
        let listing = out.structure().unwrap();
        assert!(listing.records.is_empty());
        assert_eq!(listing.summary.balance, Amount::from(1985));
        assert!(out.report().unwrap().starts_with("No records match."));
    }

    #[tokio::test]
    async fn test_list_custom_range() {
        let (env, _, _) = scenario().await;
        let args = ListArgs::default().with_custom_range(Some("2026-02-01"), Some("2026-02-05"));
        let out = list(env.config(), &args, today()).unwrap();
        assert_eq!(descriptions(&out), vec!["Salary"]);
    }

    #[tokio::test]
    async fn test_list_bad_custom_range() {
        let (env, _, _) = scenario().await;

        let args = ListArgs::default().with_custom_range(Some("2026-02-10"), Some("2026-02-01"));
        let err = list(env.config(), &args, today()).unwrap_err();
        let err = err.downcast_ref::<Error>().unwrap();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::InvertedDateRange { .. })
        ));

        let args = ListArgs::default().with_custom_range(Some("2026-02-10"), None);
        let err = list(env.config(), &args, today()).unwrap_err();
        let err = err.downcast_ref::<Error>().unwrap();
        assert_eq!(err.validation(), Some(&ValidationError::MissingDateBound));

        let args = ListArgs::default().with_custom_range(Some("yesterday"), Some("2026-02-01"));
        assert!(list(env.config(), &args, today()).is_err());
    }

    #[tokio::test]
    async fn test_list_week_range() {
        let (env, _, _) = scenario().await;
        // 2026-02-09 is a Monday, so it is in the week of Sunday 2026-02-08
        let wednesday = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
        let args = ListArgs::default().with_range(Range::Week);
        let out = list(env.config(), &args, wednesday).unwrap();
        assert_eq!(descriptions(&out), vec!["Lunch"]);
    }

    #[tokio::test]
    async fn test_list_table_report() {
        let (env, lunch, _) = scenario().await;
        let args = ListArgs::default().with_sort(SortKey::AmountAsc);
        let out = list(env.config(), &args, today()).unwrap();
        let report = out.report().unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with(&lunch.id().to_string()));
        assert!(lines[1].ends_with("-$15.00"));
        assert!(lines[2].ends_with("$2,000.00"));
        assert_eq!(
            lines[3],
            "Balance: $1,985.00  Income: $2,000.00  Expense: -$15.00"
        );
    }

    #[tokio::test]
    async fn test_list_csv_report() {
        let env = TestEnv::new().await;
        let record = env.insert("Dinner, with friends", -42, None, Some("Food"));
        let args = ListArgs::default().with_format(Format::Csv);
        let out = list(env.config(), &args, today()).unwrap();
        let expected = format!(
            "id,date,description,category,amount\n{},,\"Dinner, with friends\",Food,-42",
            record.id()
        );
        assert_eq!(out.report().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_list_json_report() {
        let (env, _, _) = scenario().await;
        let args = ListArgs::default().with_format(Format::Json);
        let out = list(env.config(), &args, today()).unwrap();
        let parsed: Vec<Record> = serde_json::from_str(out.report().unwrap()).unwrap();
        assert_eq!(parsed, out.structure().unwrap().records);
    }
}
