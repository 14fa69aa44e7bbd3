use crate::commands::Command;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "bridgeadm",
    about = "Maintenance commands for an IRC bridge's homeserver",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

fn require_sigil(value: &str, sigil: char, what: &str) -> Result<String, String> {
    if value.starts_with(sigil) && value.len() > sigil.len_utf8() {
        Ok(value.to_string())
    } else {
        Err(format!("{} must start with '{}'", what, sigil))
    }
}

pub fn parse_user_id(value: &str) -> Result<String, String> {
    require_sigil(value, '@', "user id")
}

pub fn parse_user_prefix(value: &str) -> Result<String, String> {
    require_sigil(value, '@', "prefix")
}

pub fn parse_room_id(value: &str) -> Result<String, String> {
    require_sigil(value, '!', "room id")
}

pub fn parse_room_alias(value: &str) -> Result<String, String> {
    require_sigil(value, '#', "alias")
}
