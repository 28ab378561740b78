use std::path::Path;

use anyhow::Result;

use textsum_core::AppConfig;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Configuration already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let config = AppConfig::default();
    config.save_to(path)?;

    println!("Wrote default configuration to {}", path.display());
    println!("\nPoint [model] at your artifacts:");
    println!("  tokenizer_path = \"{}\"", config.model.tokenizer_path.display());
    println!("  model_path     = \"{}\"", config.model.model_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("textsum").join("config.toml");

        run(&path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let config = AppConfig::from_toml(&content).unwrap();
        assert_eq!(config.model, AppConfig::default().model);
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let custom = "[model]\nmodel_path = \"/srv/models/pegasus-samsum\"\n";
        std::fs::write(&path, custom).unwrap();

        run(&path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), custom);

        run(&path, true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_ne!(content, custom);
        assert_eq!(
            AppConfig::from_toml(&content).unwrap().model,
            AppConfig::default().model
        );
    }
}
