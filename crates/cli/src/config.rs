//! Role config selection shared by every command.

use can::Roles;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use crate::error::Result;

/// Where roles are loaded from and how strictly they are compiled.
#[derive(Debug, Args)]
pub struct RolesArgs {
    /// Role config file (.yml, .yaml, .toml or .json)
    #[arg(short, long, env = "CANCTL_CONFIG")]
    pub config: PathBuf,

    /// Reject unknown ability names and duplicate permission keys
    #[arg(long)]
    pub strict: bool,
}

impl RolesArgs {
    /// Load and compile the configured file.
    pub fn load(&self) -> Result<Roles> {
        debug!(path = %self.config.display(), strict = self.strict, "loading roles");
        let roles = if self.strict {
            can::load_strict(&self.config)?
        } else {
            can::load(&self.config)?
        };
        Ok(roles)
    }
}
