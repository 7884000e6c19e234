//! Parsing and validation of artx.toml.

use std::path::Path;

use anyhow::Context;

use super::ArtxConfig;

pub fn parse_artx_toml(path: &Path) -> anyhow::Result<ArtxConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_artx_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_artx_toml_str(content: &str) -> anyhow::Result<ArtxConfig> {
    let config: ArtxConfig = toml::from_str(content)?;
    if config.clone.timeout_secs == 0 {
        anyhow::bail!("clone.timeout_secs must be greater than zero");
    }
    if config.clone.program.as_os_str().is_empty() {
        anyhow::bail!("clone.program must not be empty");
    }
    Ok(config)
}
