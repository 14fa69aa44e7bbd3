//! Maintenance commands.

pub mod grant_ops;
pub mod migrate_users;
pub mod parse_user;
pub mod remove_idle;
pub mod remove_user;

use crate::client::MatrixClient;
use crate::config::ConnectionArgs;
use crate::error::{Error, Result};
use crate::output::Output;
use clap::Subcommand;
use termcolor::WriteColor;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grant full ops to a user in a portal room
    GrantOps(grant_ops::GrantOpsArgs),

    /// Remove a display-name suffix such as '(irc.freenode.net)' from bridged users
    MigrateUsers(migrate_users::MigrateUsersArgs),

    /// Kick users that have been idle for too long from a bridged room
    RemoveIdleUsers(remove_idle::RemoveIdleArgs),

    /// Remove a user from every room the bridge has joined
    RemoveUser(remove_user::RemoveUserArgs),

    /// Extract IRC nicks from bridged user ids
    ParseUser(parse_user::ParseUserArgs),
}

impl Command {
    /// Run the command. Returns `false` when it completed but some of its
    /// steps failed.
    pub async fn run<W: WriteColor>(self, out: &mut Output<W>) -> Result<bool> {
        match self {
            Command::GrantOps(args) => {
                let client = connect(&args.connection)?;
                grant_ops::grant_ops(&client, &args.alias, &args.user_id, args.level, out).await?;
                Ok(true)
            }
            Command::MigrateUsers(args) => {
                let client = connect(&args.connection)?;
                let bridged = args.bridged.build()?;
                let summary =
                    migrate_users::migrate_users(&client, &bridged, &args.suffix, out).await?;
                Ok(summary.failed.is_empty())
            }
            Command::RemoveIdleUsers(args) => {
                let client = connect(&args.connection)?;
                let policy = args.policy()?;
                let room_id = match (&args.room, &args.alias) {
                    (Some(room_id), _) => room_id.clone(),
                    (None, Some(alias)) => {
                        out.line(&format!(
                            "Removing idle users in {}, not bridged and not {}",
                            alias, policy.bot_user_id
                        ));
                        client.resolve_alias(alias).await?
                    }
                    (None, None) => return Err(Error::MissingRoom),
                };
                let summary = remove_idle::kick_idlers(&client, &room_id, &policy, out).await?;
                Ok(summary.failures.is_empty())
            }
            Command::RemoveUser(args) => {
                let client = connect(&args.connection)?;
                remove_user::remove_user(&client, &args.user_id, &args.reason, out).await?;
                Ok(true)
            }
            Command::ParseUser(args) => {
                let naming = args.naming();
                let unmatched = parse_user::parse_users(&naming, &args.user_ids, out)?;
                Ok(unmatched == 0)
            }
        }
    }
}

fn connect(args: &ConnectionArgs) -> Result<MatrixClient> {
    MatrixClient::new(&args.resolve()?)
}
