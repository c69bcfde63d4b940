use crate::commands::list::totals_line;
use crate::commands::{plural, Out};
use crate::summary::{summarize, CategoryIndex, Summary};
use crate::Config;
use anyhow::Result;

/// Totals every record: the balance, the sum of income and the sum of expenses.
pub fn summary(config: &Config) -> Result<Out<Summary>> {
    let store = config.open_store()?;
    let summary = summarize(store.list())?;
    let message = format!(
        "Totals over {} record{}",
        summary.count,
        plural(summary.count)
    );
    let report = totals_line(&summary, config.currency_symbol());
    Ok(Out::new(message, summary).with_report(report))
}

/// Lists the distinct categories in use, one per line, followed by `uncategorized` when any record
/// has no category.
pub fn categories(config: &Config) -> Result<Out<CategoryIndex>> {
    let store = config.open_store()?;
    let index = CategoryIndex::from_records(store.list());

    let mut lines = index.names.clone();
    if index.has_uncategorized {
        lines.push("uncategorized".to_string());
    }
    let message = format!(
        "{} categor{} in use",
        index.names.len(),
        if index.names.len() == 1 { "y" } else { "ies" }
    );
    Ok(Out::new(message, index).with_report(lines.join("\n")))
}
