use anyhow::Result;

use textsum_core::{AppConfig, Summarizer};

pub fn run(config: &AppConfig) -> Result<()> {
    println!("Tokenizer: {}", config.model.tokenizer_path().display());
    println!("Model:     {}", config.model.model_path().display());
    println!("Device:    {}", config.runtime.device);

    let summarizer = Summarizer::from_app_config(config)?;

    println!("\nLoaded {} model.", summarizer.architecture());
    println!("Generation: {}", summarizer.params());

    Ok(())
}
