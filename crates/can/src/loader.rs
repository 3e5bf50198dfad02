//! Load roles from config files.
//!
//! The format follows the file extension: `.yml`/`.yaml`, `.toml` or
//! `.json`. Every function here returns either a complete [`Roles`] or the
//! underlying read/decode error, never a partial result.

use crate::config::{self, DiskRoles};
use crate::{Error, Result, Roles};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Detect the format from a file extension.
    ///
    /// # Errors
    /// - [`Error::UnsupportedFormat`] for a missing or unknown extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yml" | "yaml") => Ok(Format::Yaml),
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Load and compile roles from a file.
///
/// Unknown ability names degrade to [`crate::Ability::None`]; see
/// [`load_strict`] to reject them instead.
pub fn load(path: impl AsRef<Path>) -> Result<Roles> {
    let disk = read_disk(path.as_ref())?;
    Ok(config::compile(&disk))
}

/// Load roles from a file, rejecting unknown abilities and key collisions.
pub fn load_strict(path: impl AsRef<Path>) -> Result<Roles> {
    let disk = read_disk(path.as_ref())?;
    config::compile_strict(&disk)
}

/// Decode and compile roles from a reader.
pub fn from_reader<R: Read>(mut reader: R, format: Format) -> Result<Roles> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    from_str(&content, format)
}

/// Decode and compile roles from a string.
pub fn from_str(content: &str, format: Format) -> Result<Roles> {
    let disk = decode(content, format)?;
    Ok(config::compile(&disk))
}

/// Decode the disk representation without compiling it.
pub fn decode(content: &str, format: Format) -> Result<DiskRoles> {
    let disk: DiskRoles = match format {
        Format::Yaml => serde_yaml::from_str(content)?,
        Format::Toml => toml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    Ok(disk)
}

fn read_disk(path: &Path) -> Result<DiskRoles> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let disk = decode(&content, format)?;
    debug!(path = %path.display(), ?format, roles = disk.len(), "loaded role config");
    Ok(disk)
}
