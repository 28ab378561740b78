use std::io::Read;

use anyhow::{Context, Result};

use textsum_core::{AppConfig, ConsoleObserver, Summarizer};

pub fn run(config: &AppConfig, text: Option<&str>, echo: bool) -> Result<()> {
    let text = dialogue_text(text, std::io::stdin())?;

    let mut summarizer = Summarizer::from_app_config(config)?;

    if echo {
        summarizer = summarizer.with_observer(ConsoleObserver::stdout());
        summarizer.predict(&text)?;
    } else {
        let summary = summarizer.predict(&text)?;
        println!("{}", summary);
    }

    Ok(())
}

/// Use the argument unless it is absent or "-", in which case read `input` to the end
fn dialogue_text(text: Option<&str>, mut input: impl Read) -> Result<String> {
    match text {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut buffer = String::new();
            input
                .read_to_string(&mut buffer)
                .context("Failed to read dialogue from stdin")?;
            Ok(buffer)
        }
    }
}
