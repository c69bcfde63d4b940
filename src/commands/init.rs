use crate::commands::Out;
use crate::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Creates the home directory, its `data` subdirectory and an initial `config.json` file with
/// default settings.
///
/// # Arguments
/// - `home` - The directory that will hold the configuration and records, e.g. `$HOME/expenses`
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the expenses directory and config")?;
    Ok(format!(
        "Successfully created the expenses directory at {}",
        config.root().display()
    )
    .into())
}
