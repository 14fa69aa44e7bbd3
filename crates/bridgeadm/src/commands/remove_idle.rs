//! Kick idle users from a bridged room.
//!
//! The IRC side stops showing bridged Matrix users once they have been
//! offline for a while, so those users are removed from the room as well.
//! Bridged IRC users and the bridge bot itself are never kicked.

use crate::cli::{parse_room_alias, parse_room_id, parse_user_id};
use crate::client::MatrixClient;
use crate::config::ConnectionArgs;
use crate::error::{Error, Result};
use crate::filter::{BridgedUserArgs, BridgedUsers};
use crate::output::Output;
use clap::Args;
use termcolor::WriteColor;
use tracing::{info, warn};

const MS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Args)]
pub struct RemoveIdleArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The alias of the room, e.g. '#freenode_#matrix-dev:matrix.org'
    #[arg(
        short,
        long,
        value_parser = parse_room_alias,
        required_unless_present = "room",
        conflicts_with = "room"
    )]
    pub alias: Option<String>,

    /// The room id to use instead of the alias, e.g. '!curBafw45738:matrix.org'
    #[arg(long, value_parser = parse_room_id)]
    pub room: Option<String>,

    /// Days since idle users have last been active, e.g. '30'
    #[arg(short, long)]
    pub since: u64,

    #[command(flatten)]
    pub bridged: BridgedUserArgs,

    /// The user id of the bridge bot, e.g. '@appservice-irc:matrix.org'
    #[arg(short = 'u', long = "user", value_parser = parse_user_id)]
    pub bot_user_id: String,

    /// Only report what would be kicked
    #[arg(short = 'n', long)]
    pub simulate: bool,
}

impl RemoveIdleArgs {
    pub fn policy(&self) -> Result<IdlePolicy> {
        Ok(IdlePolicy {
            since_days: self.since,
            bridged: self.bridged.build()?,
            bot_user_id: self.bot_user_id.clone(),
            simulate: self.simulate,
        })
    }
}

#[derive(Debug, Clone)]
pub struct IdlePolicy {
    pub since_days: u64,
    pub bridged: BridgedUsers,
    pub bot_user_id: String,
    pub simulate: bool,
}

impl IdlePolicy {
    pub fn threshold_ms(&self) -> u64 {
        self.since_days.saturating_mul(MS_PER_DAY)
    }

    pub fn reason(&self) -> String {
        format!("Being idle for >{} days", self.since_days)
    }

    /// Bridged users and the bot stay regardless of activity.
    pub fn is_exempt(&self, user_id: &str) -> bool {
        self.bridged.contains(user_id) || user_id == self.bot_user_id
    }

    /// Unknown activity counts as active.
    pub fn is_idle(&self, last_active_ago: Option<u64>) -> bool {
        last_active_ago.is_some_and(|ago| ago > self.threshold_ms())
    }
}

#[derive(Debug)]
pub struct KickFailure {
    pub user_id: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct KickSummary {
    pub total_joined: usize,
    pub candidates: usize,
    pub kicked: Vec<String>,
    pub failures: Vec<KickFailure>,
}

/// Members of `room_id` that are not exempt and have been idle for longer
/// than the policy allows.
pub async fn idle_users(
    client: &MatrixClient,
    room_id: &str,
    policy: &IdlePolicy,
    summary: &mut KickSummary,
) -> Result<Vec<String>> {
    let members = client.joined_members(room_id).await?;
    summary.total_joined = members.len();

    // Filter before asking for presence, which is one request per user.
    let candidates: Vec<String> = members
        .into_keys()
        .filter(|user_id| !policy.is_exempt(user_id))
        .collect();
    summary.candidates = candidates.len();
    info!(
        candidates = candidates.len(),
        total = summary.total_joined,
        "Users that may be kicked if idle"
    );

    let mut idle = Vec::new();
    for user_id in candidates {
        match client.last_active_ago(&user_id).await {
            Ok(ago) if policy.is_idle(ago) => idle.push(user_id),
            Ok(_) => {}
            Err(e) => warn!(%user_id, error = %e, "Presence lookup failed, keeping user"),
        }
    }
    Ok(idle)
}

pub async fn kick_idlers<W: WriteColor>(
    client: &MatrixClient,
    room_id: &str,
    policy: &IdlePolicy,
    out: &mut Output<W>,
) -> Result<KickSummary> {
    info!(%room_id, "Processing room");
    let reason = policy.reason();

    let mut summary = KickSummary::default();
    let idle = idle_users(client, room_id, policy, &mut summary).await?;
    out.line(&format!(
        "{} idle users in {} ({}/{} members checked)",
        idle.len(),
        room_id,
        summary.candidates,
        summary.total_joined
    ));

    for user_id in idle {
        if policy.simulate {
            out.item(&format!("would kick '{}'", user_id));
            summary.kicked.push(user_id);
            continue;
        }

        info!(%room_id, %user_id, "Kicking user");
        match client.leave_member(room_id, &user_id, &reason).await {
            Ok(()) => summary.kicked.push(user_id),
            Err(error) => summary.failures.push(KickFailure { user_id, error }),
        }
    }

    if !summary.kicked.is_empty() {
        out.success(&format!(
            "{}/{} kicked users in total ({} failed requests)",
            summary.kicked.len(),
            summary.kicked.len() + summary.failures.len(),
            summary.failures.len()
        ));
    }

    if !summary.failures.is_empty() {
        out.line("Could not kick the following users:");
        for failure in &summary.failures {
            out.failure(&format!("{} - {}", failure.user_id, failure.error));
        }
    }

    Ok(summary)
}
