//! Naming scheme of a bridged IRC network.
//!
//! A bridge maps each IRC nick to a virtual user and each IRC channel to a
//! room alias, both generated from templates. [`BridgeNaming`] builds those
//! identifiers and recognises them again.

use crate::matcher::{Template, TemplateError, TemplateMatcher};

pub const SERVER: &str = "$SERVER";
pub const NICK: &str = "$NICK";
pub const CHANNEL: &str = "$CHANNEL";

pub const DEFAULT_USER_TEMPLATE: &str = "@$SERVER_$NICK";
pub const DEFAULT_DISPLAY_NAME: &str = "$NICK (IRC)";
pub const DEFAULT_ALIAS_TEMPLATE: &str = "#irc_$SERVER_$CHANNEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeNaming {
    /// Domain of the IRC network, substituted for `$SERVER`.
    pub domain: String,
    /// Server name of the homeserver the bridge registers users on.
    pub homeserver_domain: String,
    pub user_template: String,
    pub display_name: String,
    pub alias_template: String,
}

impl BridgeNaming {
    pub fn new(domain: impl Into<String>, homeserver_domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            homeserver_domain: homeserver_domain.into(),
            user_template: DEFAULT_USER_TEMPLATE.to_string(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            alias_template: DEFAULT_ALIAS_TEMPLATE.to_string(),
        }
    }

    pub fn with_user_template(mut self, template: impl Into<String>) -> Self {
        self.user_template = template.into();
        self
    }

    pub fn with_display_name(mut self, template: impl Into<String>) -> Self {
        self.display_name = template.into();
        self
    }

    pub fn with_alias_template(mut self, template: impl Into<String>) -> Self {
        self.alias_template = template.into();
        self
    }

    fn homeserver_suffix(&self) -> String {
        format!(":{}", self.homeserver_domain)
    }

    /// Matcher over user ids with `$NICK` bound to `nick_pattern`.
    pub fn user_matcher(&self, nick_pattern: &str) -> Result<TemplateMatcher, TemplateError> {
        Template::new(&self.user_template)
            .literal(SERVER, &self.domain)
            .open(NICK, nick_pattern)
            .suffix(self.homeserver_suffix())
            .compile()
    }

    /// Matcher over room aliases with `$CHANNEL` bound to `channel_pattern`.
    pub fn alias_matcher(&self, channel_pattern: &str) -> Result<TemplateMatcher, TemplateError> {
        Template::new(&self.alias_template)
            .literal(SERVER, &self.domain)
            .open(CHANNEL, channel_pattern)
            .suffix(self.homeserver_suffix())
            .compile()
    }

    pub fn claims_user_id(&self, user_id: &str) -> Result<bool, TemplateError> {
        Ok(self.user_matcher("(.*)")?.is_match(user_id))
    }

    pub fn nick_from_user_id(&self, user_id: &str) -> Result<Option<String>, TemplateError> {
        Ok(self
            .user_matcher("(.*?)")?
            .capture(user_id)
            .map(str::to_string))
    }

    pub fn user_id_from_nick(&self, nick: &str) -> String {
        format!("{}{}", self.fill_user_template(nick), self.homeserver_suffix())
    }

    /// The user id for `nick` without the sigil and without the homeserver.
    pub fn user_localpart(&self, nick: &str) -> String {
        let user_id = self.fill_user_template(nick);
        match user_id.strip_prefix('@') {
            Some(localpart) => localpart.to_string(),
            None => user_id,
        }
    }

    pub fn display_name_from_nick(&self, nick: &str) -> String {
        self.display_name
            .replace(NICK, nick)
            .replace(SERVER, &self.domain)
    }

    pub fn claims_alias(&self, alias: &str) -> Result<bool, TemplateError> {
        Ok(self.alias_matcher("#(.*)")?.is_match(alias))
    }

    pub fn channel_from_alias(&self, alias: &str) -> Result<Option<String>, TemplateError> {
        Ok(self
            .alias_matcher("([^:]*)")?
            .capture(alias)
            .map(str::to_string))
    }

    pub fn alias_from_channel(&self, channel: &str) -> String {
        let alias = self
            .alias_template
            .replace(SERVER, &self.domain)
            .replace(CHANNEL, channel);
        format!("{}{}", alias, self.homeserver_suffix())
    }

    /// Pattern for every user id this bridge may create, as used in
    /// registration namespaces.
    pub fn user_regex(&self) -> Result<String, TemplateError> {
        Ok(self.user_matcher(".*")?.to_string())
    }

    /// Pattern for every alias this bridge may create.
    pub fn alias_regex(&self) -> Result<String, TemplateError> {
        Ok(self.alias_matcher(".*")?.to_string())
    }

    fn fill_user_template(&self, nick: &str) -> String {
        self.user_template
            .replace(SERVER, &self.domain)
            .replace(NICK, nick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freenode() -> BridgeNaming {
        BridgeNaming::new("irc.freenode.net", "matrix.org")
    }

    #[test]
    fn test_user_id_round_trip() {
        let naming = freenode();
        let user_id = naming.user_id_from_nick("alice");
        assert_eq!(user_id, "@irc.freenode.net_alice:matrix.org");
        assert!(naming.claims_user_id(&user_id).unwrap());
        assert_eq!(
            naming.nick_from_user_id(&user_id).unwrap().as_deref(),
            Some("alice")
        );
    }

    #[test]
    fn test_foreign_user_not_claimed() {
        let naming = freenode();
        assert!(!naming.claims_user_id("@alice:matrix.org").unwrap());
        assert!(!naming
            .claims_user_id("@irc.freenode.net_alice:evil.org")
            .unwrap());
        assert_eq!(naming.nick_from_user_id("@bob:matrix.org").unwrap(), None);
    }

    #[test]
    fn test_custom_user_template() {
        let naming = freenode().with_user_template("@freenode_$NICK");
        assert!(naming.claims_user_id("@freenode_carol:matrix.org").unwrap());
        assert_eq!(naming.user_localpart("carol"), "freenode_carol");
        assert_eq!(
            naming.nick_from_user_id("@freenode_carol:matrix.org").unwrap().as_deref(),
            Some("carol")
        );
    }

    #[test]
    fn test_user_localpart() {
        assert_eq!(freenode().user_localpart("dave"), "irc.freenode.net_dave");
    }

    #[test]
    fn test_display_name() {
        let naming = freenode().with_display_name("$NICK ($SERVER)");
        assert_eq!(naming.display_name_from_nick("erin"), "erin (irc.freenode.net)");
        assert_eq!(freenode().display_name_from_nick("erin"), "erin (IRC)");
    }

    #[test]
    fn test_alias_round_trip() {
        let naming = freenode();
        let alias = naming.alias_from_channel("#rust");
        assert_eq!(alias, "#irc_irc.freenode.net_#rust:matrix.org");
        assert!(naming.claims_alias(&alias).unwrap());
        assert_eq!(
            naming.channel_from_alias(&alias).unwrap().as_deref(),
            Some("#rust")
        );
    }

    #[test]
    fn test_alias_without_channel_prefix_not_claimed() {
        let naming = freenode();
        assert!(!naming
            .claims_alias("#irc_irc.freenode.net_rust:matrix.org")
            .unwrap());
    }

    #[test]
    fn test_namespace_regexes() {
        let naming = BridgeNaming::new("irc.example.org", "example.org");
        assert_eq!(
            naming.user_regex().unwrap(),
            r"(?s)^@irc\.example\.org_.*:example\.org$"
        );
        assert_eq!(
            naming.alias_regex().unwrap(),
            r"(?s)^\#irc_irc\.example\.org_.*:example\.org$"
        );
    }

    #[test]
    fn test_unbound_placeholder_in_user_template() {
        let naming = freenode().with_user_template("@$NETWORK_$NICK");
        assert!(matches!(
            naming.claims_user_id("@x_y:matrix.org"),
            Err(TemplateError::UnboundPlaceholder { .. })
        ));
    }
}
