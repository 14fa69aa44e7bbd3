//! Strip a display-name suffix from bridged users.
//!
//! Older bridge versions appended the IRC network to every display name,
//! e.g. `alice (irc.freenode.net)`. This walks every room the bridge has
//! joined and renames the bridged users that still carry the suffix.

use crate::client::MatrixClient;
use crate::config::ConnectionArgs;
use crate::error::{Error, Result};
use crate::filter::{BridgedUserArgs, BridgedUsers};
use crate::output::Output;
use clap::Args;
use std::collections::BTreeMap;
use termcolor::WriteColor;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Args)]
pub struct MigrateUsersArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub bridged: BridgedUserArgs,

    /// Suffix to remove, e.g. '(irc.freenode.net)'
    #[arg(short, long)]
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub user_id: String,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub migrated: Vec<Migration>,
    pub failed: Vec<(Migration, Error)>,
}

/// `name` without a trailing `suffix` and without trailing whitespace.
pub fn strip_suffix(name: &str, suffix: &str) -> String {
    name.strip_suffix(suffix).unwrap_or(name).trim_end().to_string()
}

/// Bridged members of every joined room whose display name ends in
/// `suffix`, keyed by user id.
pub async fn find_suffixed_users(
    client: &MatrixClient,
    bridged: &BridgedUsers,
    suffix: &str,
) -> Result<BTreeMap<String, String>> {
    let rooms = client.joined_rooms().await?;
    info!(rooms = rooms.len(), "Scanning joined rooms");

    let mut users = BTreeMap::new();
    for room_id in &rooms {
        let members = client.joined_members(room_id).await?;
        debug!(%room_id, members = members.len(), "Fetched members");
        for (user_id, member) in members {
            if !bridged.contains(&user_id) {
                continue;
            }
            if let Some(name) = member.display_name.filter(|n| n.ends_with(suffix)) {
                users.insert(user_id, name);
            }
        }
    }
    Ok(users)
}

pub async fn migrate_users<W: WriteColor>(
    client: &MatrixClient,
    bridged: &BridgedUsers,
    suffix: &str,
    out: &mut Output<W>,
) -> Result<MigrationSummary> {
    let users = find_suffixed_users(client, bridged, suffix).await?;
    info!(users = users.len(), "Found users to migrate");

    let mut summary = MigrationSummary::default();
    for (user_id, old_name) in users {
        let migration = Migration {
            new_name: strip_suffix(&old_name, suffix),
            user_id,
            old_name,
        };
        out.line(&format!(
            "Migrating {} from {} to {}",
            migration.user_id, migration.old_name, migration.new_name
        ));

        match client
            .set_display_name(&migration.user_id, &migration.new_name)
            .await
        {
            Ok(_) => summary.migrated.push(migration),
            Err(e) => {
                warn!(user_id = %migration.user_id, error = %e, "Failed to set display name");
                out.failure(&format!("{} - {}", migration.user_id, e));
                summary.failed.push((migration, e));
            }
        }
    }

    if summary.failed.is_empty() {
        out.success(&format!("Migrated {} users.", summary.migrated.len()));
    } else {
        out.warning(&format!(
            "Migrated {} users, {} failed.",
            summary.migrated.len(),
            summary.failed.len()
        ));
    }
    Ok(summary)
}
