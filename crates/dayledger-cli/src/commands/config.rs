//! Configuration commands.

use std::path::Path;

use crate::config::AppConfig;
use crate::error::ClientResult;

/// Dump the current configuration to stdout.
pub fn dump(config: &AppConfig, source: &Path) -> ClientResult<()> {
    let toml_str = config.to_toml()?;
    println!("# config.toml ({})", source.display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration.
///
/// Loading already validated it; this reports what was checked.
pub fn validate(config: &AppConfig) -> ClientResult<()> {
    config.validate()?;
    println!(
        "Configuration is valid: {} rule(s), {} project mapping(s), provider {} ({}).",
        config.rules.len(),
        config.projects.len(),
        config.provider.kind.as_str(),
        config.provider.path.display()
    );
    Ok(())
}

/// Show the configuration file path.
pub fn path(source: &Path) -> ClientResult<()> {
    println!("config: {}", source.display());
    Ok(())
}
