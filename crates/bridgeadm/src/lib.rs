pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod output;
pub mod registration;

pub use bridgeadm_match::{BridgeNaming, Template, TemplateError, TemplateMatcher};
pub use error::{Error, Result};
