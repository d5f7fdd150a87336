//! CLI commands for the persisted configuration

use std::path::Path;

use crate::config::EditorConfig;

pub fn show() -> anyhow::Result<()> {
    let path = EditorConfig::config_path()?;
    let config = EditorConfig::load_from(&path)?;
    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub fn set_localization(path: &Path) -> anyhow::Result<()> {
    let mut config = EditorConfig::load()?;
    config.localization_path = Some(path.to_string_lossy().into_owned());
    config.save()?;
    println!("Localization reference set to {}", path.display());
    Ok(())
}

pub fn clear_localization() -> anyhow::Result<()> {
    let mut config = EditorConfig::load()?;
    config.localization_path = None;
    config.save()?;
    println!("Localization reference cleared");
    Ok(())
}
