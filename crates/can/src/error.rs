//! Error types for loading and compiling roles.
//!
//! Authorization decisions never produce errors; only configuration does.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid YAML for the role schema.
    #[error("failed to parse YAML roles: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The config file is not valid TOML for the role schema.
    #[error("failed to parse TOML roles: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config file is not valid JSON for the role schema.
    #[error("failed to parse JSON roles: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An ability name did not parse (strict compilation only).
    #[error("unknown ability '{value}' in {role}.{permission}")]
    UnknownAbility {
        role: String,
        permission: String,
        value: String,
    },

    /// Two declarations produced the same lookup key (strict compilation only).
    #[error("permission key '{key}' defined more than once in role '{role}'")]
    KeyCollision { role: String, key: String },
}

pub type Result<T> = std::result::Result<T, Error>;
