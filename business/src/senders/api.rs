//! Sender endpoint client.
//!
//! Performs network IO against `/api/marketing/senders`. Every request
//! carries `Authorization: Bearer {auth_token}`. Callers map the results into
//! loader state or action outcomes.

use chrono::{Local, TimeZone};
use log::{debug, error, info};

use super::error::{ActionDispatchError, LoadError};
use super::model::{ListSendersResponse, SenderId, SenderRow};
use crate::config::ConnectionConfig;
use crate::http::Client;

/// GET `/api/marketing/senders`, normalized into rows (local time zone dates).
pub async fn list_senders(config: &ConnectionConfig) -> Result<Vec<SenderRow>, LoadError> {
    list_senders_in(config, &Local).await
}

/// GET `/api/marketing/senders`, converting `createdOn` instants into `tz`.
pub async fn list_senders_in<Tz: TimeZone>(
    config: &ConnectionConfig,
    tz: &Tz,
) -> Result<Vec<SenderRow>, LoadError> {
    if let Some(field) = config.missing_field() {
        return Err(LoadError::InvalidConfig(field));
    }

    let url = config.senders_url();
    debug!("Fetching senders from {url}");

    let response = Client::get(&url)
        .bearer_auth(config.auth_token())
        .send()
        .await
        .map_err(|e| {
            error!("Error fetching senders: {e}");
            LoadError::transport(e.to_string())
        })?;

    if !response.is_success() {
        error!("Sender list returned status {}", response.status);
        return Err(LoadError::http_status(response.status));
    }

    // A JSON `null` body carries no data, same as a missing `data` field.
    let body: Option<ListSendersResponse> = response.json().map_err(|e| {
        error!("Error parsing sender list: {e}");
        LoadError::transport(format!("Failed to parse ListSendersResponse: {e}"))
    })?;

    let rows = body.unwrap_or_default().into_rows_in(tz);
    info!("Loaded {} sender(s)", rows.len());
    Ok(rows)
}

/// DELETE `/api/marketing/senders?id={id}`
pub async fn delete_sender(
    config: &ConnectionConfig,
    id: &SenderId,
) -> Result<(), ActionDispatchError> {
    if let Some(field) = config.missing_field() {
        return Err(ActionDispatchError::rejected(format!(
            "invalid connection config: `{field}` is required"
        )));
    }
    if id.is_missing() {
        return Err(ActionDispatchError::SenderNotFound(id.clone()));
    }

    let response = Client::delete(config.senders_url())
        .bearer_auth(config.auth_token())
        .query("id", id.to_string())
        .send()
        .await
        .map_err(|e| ActionDispatchError::rejected(e.to_string()))?;

    if !response.is_success() {
        return Err(ActionDispatchError::rejected(format!(
            "API returned status: {}",
            response.status
        )));
    }

    info!("Deleted sender {id}");
    Ok(())
}
