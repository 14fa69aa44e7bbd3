//! Grant a power level to a user in a portal room.

use crate::cli::{parse_room_alias, parse_user_id};
use crate::client::MatrixClient;
use crate::config::ConnectionArgs;
use crate::error::{Error, Result};
use crate::output::Output;
use clap::Args;
use serde_json::{json, Value};
use termcolor::WriteColor;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct GrantOpsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The user id to grant ops to, e.g. '@matthew:matrix.org'
    #[arg(short = 'u', long = "userid", value_parser = parse_user_id)]
    pub user_id: String,

    /// The alias of the portal room, e.g. '#freenode_#matrix-dev:matrix.org'
    #[arg(short, long, value_parser = parse_room_alias)]
    pub alias: String,

    /// Power level to grant
    #[arg(long, default_value_t = 100)]
    pub level: i64,
}

/// Set `users[user_id]` in a power levels event, creating the map if absent.
pub fn set_user_level(event: &mut Value, user_id: &str, level: i64) -> Result<()> {
    let content = event.as_object_mut().ok_or_else(|| {
        Error::UnexpectedResponse("power levels event is not an object".to_string())
    })?;
    let users = content
        .entry("users")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| Error::UnexpectedResponse("power levels 'users' is not an object".to_string()))?;
    users.insert(user_id.to_string(), json!(level));
    Ok(())
}

/// Returns the power levels event as written back.
pub async fn grant_ops<W: WriteColor>(
    client: &MatrixClient,
    alias: &str,
    user_id: &str,
    level: i64,
    out: &mut Output<W>,
) -> Result<Value> {
    out.heading(&format!("Granting ops to {} in {}", user_id, alias));

    let room_id = client.resolve_alias(alias).await?;
    info!(%alias, %room_id, "Resolved alias");

    let mut event = client.power_levels(&room_id).await?;
    out.line("Modifying existing power level event:");
    out.json(&event);

    set_user_level(&mut event, user_id, level)?;
    client.set_power_levels(&room_id, &event).await?;
    info!(%room_id, %user_id, level, "Power levels updated");

    out.success("Granted.");
    Ok(event)
}
