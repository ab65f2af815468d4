use std::path::Path;

use anyhow::{bail, Result};

use rebound_core::RefreshConfig;

pub fn show(path: &Path) -> Result<()> {
    let config = RefreshConfig::load_from(path)?;
    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists.\nUse --force to overwrite it with the defaults.",
            path.display()
        );
    }
    RefreshConfig::default().save_to(path)?;
    tracing::info!(path = %path.display(), "wrote default configuration");
    println!("Wrote {}", path.display());
    Ok(())
}
