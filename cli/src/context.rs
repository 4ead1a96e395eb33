//! Grid construction for one-shot CLI commands.

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use sender_grid_business::config::ENV_PREFIX;
use sender_grid_business::{GridConfig, HttpDeleteDispatcher, SenderGrid};
use sender_grid_states::SignalHub;
use tracing::instrument;

use crate::output::Output;

/// Merges `SENDER_GRID_*` variables with values given on the command line.
///
/// Flags take precedence over the environment.
pub fn resolve_config<I>(
    vars: I,
    base_url: Option<String>,
    auth_token: Option<String>,
) -> Result<GridConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut scoped: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect();

    for (name, value) in [("BASE_URL", base_url), ("AUTH_TOKEN", auth_token)] {
        if let Some(value) = value {
            let key = format!("{ENV_PREFIX}{name}");
            scoped.retain(|(existing, _)| existing != &key);
            scoped.push((key, value));
        }
    }

    GridConfig::from_vars(scoped).context("Invalid sender grid configuration")
}

/// A grid that deletes over HTTP and has no host signals to listen to.
pub fn build_grid(config: GridConfig) -> SenderGrid {
    let dispatcher = HttpDeleteDispatcher::new(config.connection.clone());
    SenderGrid::new(config, Arc::new(dispatcher), Arc::new(SignalHub::new()))
}

/// Mounts the grid and waits for the first load to settle.
///
/// Load failures are printed and turned into an error.
#[instrument(skip_all, name = "load_senders")]
pub async fn load_grid(grid: &mut SenderGrid, out: &Output) -> Result<()> {
    grid.mount();
    load_settled(grid, out).await
}

/// Waits for loads in flight and reports their outcome.
pub async fn load_settled(grid: &mut SenderGrid, out: &Output) -> Result<()> {
    grid.settle().await;

    let notifications = grid.take_notifications();
    for notification in &notifications {
        out.notification(notification);
    }
    if let Some(err) = grid.error() {
        bail!("Could not load senders: {err}");
    }
    Ok(())
}
