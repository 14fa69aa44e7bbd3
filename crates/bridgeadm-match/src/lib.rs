//! Identifier template matching.
//!
//! A bridge names the virtual users it creates from a template such as
//! `@$SERVER_$NICK`. This crate turns such a template into a regex that
//! recognises identifiers generated from it, and extracts the variable part.
//!
//! # Example
//!
//! ```
//! use bridgeadm_match::Template;
//!
//! let matcher = Template::new("@$SERVER_$NICK")
//!     .literal("$SERVER", "irc.example.org")
//!     .open("$NICK", "(.*)")
//!     .suffix(":example.org")
//!     .compile()
//!     .unwrap();
//!
//! assert!(matcher.is_match("@irc.example.org_alice:example.org"));
//! assert_eq!(
//!     matcher.capture("@irc.example.org_alice:example.org"),
//!     Some("alice")
//! );
//!
//! // Literal dots stay literal.
//! assert!(!matcher.is_match("@ircXexample.org_alice:example.org"));
//! ```

mod matcher;
pub mod naming;

pub use matcher::{compile, Anchor, Template, TemplateError, TemplateMatcher};
pub use naming::BridgeNaming;
