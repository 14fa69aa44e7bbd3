//! Remove a user from every room the bridge has joined.

use crate::cli::parse_user_id;
use crate::client::MatrixClient;
use crate::config::ConnectionArgs;
use crate::error::Result;
use crate::output::Output;
use clap::Args;
use termcolor::WriteColor;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct RemoveUserArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The user id to remove, e.g. '@matthew:matrix.org'
    #[arg(short = 'u', long = "userid", value_parser = parse_user_id)]
    pub user_id: String,

    /// Reason attached to each kick
    #[arg(long, default_value = "Kicked by script")]
    pub reason: String,
}

/// Kick `user_id` from each room a sync shows them in. Stops at the first
/// failed kick. Returns the rooms the user was kicked from.
pub async fn remove_user<W: WriteColor>(
    client: &MatrixClient,
    user_id: &str,
    reason: &str,
    out: &mut Output<W>,
) -> Result<Vec<String>> {
    out.heading(&format!("Removing {} from all bridged rooms", user_id));

    let room_ids = client.joined_rooms_of(user_id).await?;
    out.line(&format!("Removing user from {} rooms", room_ids.len()));

    for room_id in &room_ids {
        out.item(room_id);
        client.kick(room_id, user_id, reason).await?;
        info!(%room_id, %user_id, "Kicked");
    }

    out.success("Done.");
    Ok(room_ids)
}
