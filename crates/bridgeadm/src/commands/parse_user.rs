//! Offline inspection of bridged user ids.

use crate::error::Result;
use crate::output::Output;
use bridgeadm_match::naming::DEFAULT_USER_TEMPLATE;
use bridgeadm_match::BridgeNaming;
use clap::Args;
use termcolor::WriteColor;

#[derive(Debug, Clone, Args)]
pub struct ParseUserArgs {
    /// User id template of bridged users
    #[arg(long, default_value = DEFAULT_USER_TEMPLATE)]
    pub template: String,

    /// IRC server domain substituted for $SERVER
    #[arg(long)]
    pub server: String,

    /// Homeserver name that bridged user ids end in
    #[arg(long)]
    pub homeserver_domain: String,

    /// User ids to inspect
    #[arg(required = true)]
    pub user_ids: Vec<String>,
}

impl ParseUserArgs {
    pub fn naming(&self) -> BridgeNaming {
        BridgeNaming::new(&self.server, &self.homeserver_domain).with_user_template(&self.template)
    }
}

/// Print the nick behind each user id. Returns how many ids were not
/// generated by the bridge.
pub fn parse_users<W: WriteColor>(
    naming: &BridgeNaming,
    user_ids: &[String],
    out: &mut Output<W>,
) -> Result<usize> {
    let matcher = naming.user_matcher("(.*?)")?;
    let mut unmatched = 0;
    for user_id in user_ids {
        match matcher.capture(user_id) {
            Some(nick) => out.success(&format!("{} -> {}", user_id, nick)),
            None => {
                unmatched += 1;
                out.failure(&format!("{} is not a bridged user", user_id));
            }
        }
    }
    Ok(unmatched)
}
