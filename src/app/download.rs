use std::path::Path;
use std::process::{Command as ProcessCommand, Stdio};

use anyhow::{Context, Result, bail};
use tracing::info;

/// Hands `link` to the configured downloader and waits for it to exit.
pub(crate) fn launch(link: &str, downloader: &Path) -> Result<()> {
    if link.trim().is_empty() {
        bail!("nothing to download: empty link");
    }

    info!(downloader = %downloader.display(), link, "launching downloader");
    let status = ProcessCommand::new(downloader)
        .arg(link)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to launch {}", downloader.display()))?;

    if !status.success() {
        bail!("{} exited with {status}", downloader.display());
    }
    Ok(())
}
