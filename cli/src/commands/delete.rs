//! Delete sender command.

use anyhow::{Result, bail};
use sender_grid_business::{GridConfig, SenderId};
use tracing::instrument;

use crate::context::{build_grid, load_grid, load_settled};
use crate::output::Output;

/// Loads the senders first so the row (and its name) can be resolved.
#[instrument(skip_all, name = "delete", fields(id = %id))]
pub async fn run_delete(config: GridConfig, id: &str) -> Result<()> {
    let out = Output::new();
    let mut grid = build_grid(config);
    load_grid(&mut grid, &out).await?;

    let Ok(sender) = id.parse::<SenderId>();
    let result = grid.delete(&sender).await;
    for notification in grid.take_notifications() {
        out.notification(&notification);
    }

    if let Err(err) = result {
        bail!("Delete failed: {err}");
    }

    // The reload policy has already started a refresh.
    if grid.is_loading() {
        load_settled(&mut grid, &out).await?;
        out.total("Remaining", grid.rows().len(), grid.rows().len());
    }
    Ok(())
}
