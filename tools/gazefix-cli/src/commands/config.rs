//! Show or initialize the configuration file.

use std::path::{Path, PathBuf};

use gazefix_common::config::{config_file_path, AppConfig};

pub fn show(config: &AppConfig, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    if path.exists() {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# No file at {}; showing defaults", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

pub fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let target = path.clone().unwrap_or_else(config_file_path);
    if target.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            target.display()
        );
    }

    let config = AppConfig::default();
    let written = match path {
        Some(path) => config.save_to(&path).map(|()| path),
        None => config.save(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Wrote default config to {}", written.display());
    Ok(())
}
