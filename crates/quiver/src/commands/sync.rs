//! Defaults sync command

use anyhow::Result;
use camino::Utf8Path;
use quiver_addons::SyncOutcome;
use tracing::info;

use super::common::load_manager;
use crate::output;

pub async fn run(config: Option<&Utf8Path>) -> Result<()> {
    let manager = load_manager(config)?;
    let outcomes = manager.sync_defaults().await;
    info!("Synchronized {} default addon entries", outcomes.len());
    print_outcomes(&outcomes);
    Ok(())
}

/// One line per entry, then a summary
pub fn print_outcomes(outcomes: &[SyncOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => output::success(&outcome.entry),
            Err(e) => output::addon_error(&outcome.entry, e),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    output::info(&format!(
        "{} default addon(s) synchronized, {} failed",
        outcomes.len() - failed,
        failed
    ));
}
