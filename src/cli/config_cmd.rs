use anyhow::{Context, Result};

use crate::core::config::AppConfig;

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    let path = AppConfig::default()
        .save()
        .context("Failed to generate config")?;
    println!("Generated config at {}", path.display());
    Ok(())
}

pub fn check() -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        println!("No config file at {}, using defaults.", path.display());
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let problems = config.validate();
    if problems.is_empty() {
        println!("Config OK: {}", path.display());
        return Ok(());
    }

    eprintln!("{}:", path.display());
    for problem in &problems {
        eprintln!("  {}", problem);
    }
    std::process::exit(1);
}

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
