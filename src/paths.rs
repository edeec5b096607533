use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "subwatch";

pub fn data_dir_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join(APP_DIR))
}

pub fn watchlist_file_path() -> Result<PathBuf> {
    Ok(data_dir_path()?.join("watchlist.txt"))
}
