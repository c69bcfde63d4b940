//! Handlers that change the record set: add, edit and delete.

use crate::args::{AddArgs, DeleteArgs, EditArgs};
use crate::commands::Out;
use crate::model::{parse_date, Amount, Record, RecordFields};
use crate::session::EditSession;
use crate::{Config, Error};
use anyhow::Result;
use std::str::FromStr;

/// Validates the input and stores a new record.
///
/// # Errors
/// - Returns an error if the description is blank, or the amount or date cannot be parsed.
/// - Returns an error if the record set cannot be saved. The record was still created in memory,
///   but it is lost when the program exits.
pub fn add(config: &Config, args: &AddArgs) -> Result<Out<Record>> {
    let fields = RecordFields::parse(
        args.description(),
        args.amount(),
        args.date(),
        args.category(),
    )
    .map_err(Error::from)?;
    let mut store = config.open_store()?;
    let mut session = EditSession::new();
    let record = session.commit(&mut store, fields)?;
    let message = format!(
        "Added record {}: {} {}",
        record.id(),
        record.description(),
        record.amount().display_with(config.currency_symbol())
    );
    Ok(Out::new(message, record))
}

/// Loads the record with the given id, applies the changes given in `args` and saves it. Fields
/// that `args` does not mention keep their current values.
///
/// # Errors
/// - Returns an error if no record has the id.
/// - Returns an error if any of the new values are invalid.
/// - Returns an error if the record set cannot be saved.
pub fn edit(config: &Config, args: &EditArgs) -> Result<Out<Record>> {
    let mut store = config.open_store()?;
    let current = store
        .get(args.id())
        .cloned()
        .ok_or(Error::NotFound(args.id()))?;

    let mut session = EditSession::new();
    let mut fields = session.begin_edit(&current);
    if let Some(description) = args.description() {
        fields.description = description.to_string();
    }
    if let Some(amount) = args.amount() {
        fields.amount = Amount::from_str(amount).map_err(Error::from)?;
    }
    if args.no_date() {
        fields.date = None;
    } else if let Some(date) = args.date() {
        fields.date = parse_date(date).map_err(Error::from)?;
    }
    if args.no_category() {
        fields.category = None;
    } else if let Some(category) = args.category() {
        fields.category = Some(category.to_string());
    }

    let record = session.commit(&mut store, fields)?;
    Ok(Out::new(format!("Updated record {}", record.id()), record))
}

/// Removes the record with the given id.
///
/// # Errors
/// - Returns an error if no record has the id.
/// - Returns an error if the record set cannot be saved.
pub fn delete(config: &Config, args: &DeleteArgs) -> Result<Out<Record>> {
    let mut store = config.open_store()?;
    let removed = store.delete(args.id())?;
    let message = format!(
        "Deleted record {}: {}",
        removed.id(),
        removed.description()
    );
    Ok(Out::new(message, removed))
}
