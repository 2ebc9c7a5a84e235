//! Start command

use anyhow::{anyhow, Result};
use camino::Utf8Path;
use quiver_addons::ActivationOutcome;
use tracing::{info, warn};

use super::common::{describe, load_manager};
use super::sync::print_outcomes;
use crate::output;

pub async fn run(config: Option<&Utf8Path>) -> Result<()> {
    let manager = load_manager(config)?;

    let report = manager.start().await.map_err(|e| anyhow!(describe(&e)))?;
    if report.failure_count() > 0 {
        warn!("Startup finished with {} failure(s)", report.failure_count());
    } else {
        info!("Startup finished");
    }

    output::header("Default addons");
    print_outcomes(&report.defaults);

    output::header("Client bundles");
    print_activations(&report.optimized);

    output::header("Server addons");
    print_activations(&report.activated);

    let addons = manager.list().await;
    println!();
    if report.failure_count() == 0 {
        output::success(&format!("{} addon(s) ready", addons.len()));
    } else {
        output::warning(&format!(
            "{} addon(s) ready, {} failure(s)",
            addons.len(),
            report.failure_count()
        ));
    }
    output::kv(
        "static",
        &format!(
            "{} -> {}",
            manager.static_prefix(),
            manager.static_root().display()
        ),
    );

    Ok(())
}

fn print_activations(outcomes: &[ActivationOutcome]) {
    if outcomes.is_empty() {
        output::info("none");
    }
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => output::success(&outcome.name),
            Err(e) => output::addon_error(&outcome.name, e),
        }
    }
}
