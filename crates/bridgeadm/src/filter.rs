//! Recognising users the bridge created.

use crate::cli::parse_user_prefix;
use crate::error::{Error, Result};
use bridgeadm_match::{BridgeNaming, TemplateMatcher};
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct BridgedUserArgs {
    /// User id prefix of bridged users, e.g. '@freenode_'
    #[arg(short, long, value_parser = parse_user_prefix, required_unless_present = "template")]
    pub prefix: Option<String>,

    /// User id template of bridged users, e.g. '@$SERVER_$NICK'
    #[arg(long, conflicts_with = "prefix", requires_all = ["server", "homeserver_domain"])]
    pub template: Option<String>,

    /// IRC server domain substituted for $SERVER in --template
    #[arg(long)]
    pub server: Option<String>,

    /// Homeserver name that bridged user ids end in, e.g. 'matrix.org'
    #[arg(long)]
    pub homeserver_domain: Option<String>,
}

impl BridgedUserArgs {
    pub fn build(&self) -> Result<BridgedUsers> {
        match (&self.template, &self.prefix) {
            (Some(template), _) => {
                let naming = BridgeNaming::new(
                    self.server.clone().unwrap_or_default(),
                    self.homeserver_domain.clone().unwrap_or_default(),
                )
                .with_user_template(template);
                Ok(BridgedUsers::Template(naming.user_matcher("(.*)")?))
            }
            (None, Some(prefix)) => Ok(BridgedUsers::Prefix(prefix.clone())),
            (None, None) => Err(Error::MissingBridgedUsers),
        }
    }
}

#[derive(Debug, Clone)]
pub enum BridgedUsers {
    Prefix(String),
    Template(TemplateMatcher),
}

impl BridgedUsers {
    pub fn contains(&self, user_id: &str) -> bool {
        match self {
            BridgedUsers::Prefix(prefix) => user_id.starts_with(prefix.as_str()),
            BridgedUsers::Template(matcher) => matcher.is_match(user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(prefix: Option<&str>, template: Option<&str>) -> BridgedUserArgs {
        BridgedUserArgs {
            prefix: prefix.map(str::to_string),
            template: template.map(str::to_string),
            server: Some("irc.freenode.net".to_string()),
            homeserver_domain: Some("matrix.org".to_string()),
        }
    }

    #[test]
    fn test_prefix_filter() {
        let users = args(Some("@freenode_"), None).build().unwrap();
        assert!(users.contains("@freenode_alice:matrix.org"));
        assert!(!users.contains("@alice:matrix.org"));
    }

    #[test]
    fn test_template_filter() {
        let users = args(None, Some("@freenode_$NICK")).build().unwrap();
        assert!(users.contains("@freenode_alice:matrix.org"));
        assert!(!users.contains("@freenode_alice:evil.org"));
        assert!(!users.contains("@alice:matrix.org"));
    }

    #[test]
    fn test_template_with_server() {
        let users = args(None, Some("@$SERVER_$NICK")).build().unwrap();
        assert!(users.contains("@irc.freenode.net_bob:matrix.org"));
        assert!(!users.contains("@ircXfreenode.net_bob:matrix.org"));
    }

    #[test]
    fn test_no_filter_rejected() {
        assert!(matches!(
            args(None, None).build(),
            Err(Error::MissingBridgedUsers)
        ));
    }

    #[test]
    fn test_bad_template() {
        assert!(args(None, Some("@$NETWORK_$NICK")).build().is_err());
    }
}
