//! List senders command.

use anyhow::{Context as _, Result};
use sender_grid_business::{GridConfig, SenderRow};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::context::{build_grid, load_grid};
use crate::output::Output;

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From Name")]
    from_name: String,
    #[tabled(rename = "From Email")]
    from_email: String,
    #[tabled(rename = "Reply To")]
    reply_to: String,
    #[tabled(rename = "Created By")]
    created_by: String,
    #[tabled(rename = "Created On")]
    created_on: String,
    #[tabled(rename = "Domain Verified")]
    domain_verified: &'static str,
    #[tabled(rename = "Verified")]
    verified: &'static str,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Renders rows with a 1-based position column.
fn render_table(rows: &[&SenderRow]) -> String {
    let table_rows: Vec<ListRow> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| ListRow {
            position: index + 1,
            id: row.id.to_string(),
            from_name: row.from_name.clone(),
            from_email: row.from_email.clone(),
            reply_to: row.reply_to.clone(),
            created_by: row.created_by.clone(),
            created_on: row.created_on.clone(),
            domain_verified: yes_no(row.domain_verified),
            verified: yes_no(row.verified),
        })
        .collect();

    let mut table = Table::new(&table_rows);
    table.with(Style::rounded());
    table.to_string()
}

#[instrument(skip_all, name = "list", fields(query = query.as_deref().unwrap_or("")))]
pub async fn run_list(config: GridConfig, query: Option<String>, json: bool) -> Result<()> {
    let out = Output::new();
    let mut grid = build_grid(config);
    load_grid(&mut grid, &out).await?;

    if let Some(query) = query {
        grid.set_query(query);
    }
    let rows = grid.visible_rows();

    if json {
        let printed = serde_json::to_string_pretty(&rows).context("Failed to encode senders")?;
        out.print(printed);
        return Ok(());
    }

    if rows.is_empty() {
        out.dim("No senders found.");
        return Ok(());
    }

    out.newline();
    out.print(render_table(&rows));
    out.total("Total", rows.len(), grid.rows().len());
    Ok(())
}
