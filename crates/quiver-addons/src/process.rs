//! External tool invocation

use anyhow::{anyhow, Context, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Run `program args...`, optionally in `cwd` and under a timeout.
///
/// Stdout is logged at debug level; a non-zero exit becomes an error that
/// carries the tool's stderr.
pub async fn run_tool<I, S>(
    program: &str,
    args: I,
    cwd: Option<&Path>,
    timeout: Option<Duration>,
) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    debug!("Running: {} (cwd: {:?})", program, cwd);
    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to spawn {}", program))?;

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| anyhow!("{} timed out after {:?}", program, limit))?,
        None => child.wait_with_output().await,
    }
    .with_context(|| format!("Failed to wait for {}", program))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!("{}: {}", program, line);
    }

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!(
            "{} failed with {}: {}",
            program,
            output.status,
            stderr.trim()
        ))
    }
}
