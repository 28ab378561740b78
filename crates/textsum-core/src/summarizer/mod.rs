mod encoder;
mod observer;
mod params;

pub use encoder::{EncodedInput, InputEncoder};
pub use observer::{ConsoleObserver, NoopObserver, PredictionObserver, TracingObserver};
pub use params::{GenerationParameters, SUMMARY_GENERATION};

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::backend::{self, ModelArchitecture, ModelArtifacts, Seq2SeqBackend};
use crate::config::{AppConfig, ModelConfig, RuntimeConfig};
use crate::{Error, GenerationStage, Result};

/// Dialogue summarizer owning a loaded tokenizer and seq2seq model.
///
/// `predict` takes `&mut self`, so one instance serves one call at a time.
/// Share it behind a `Mutex` or load one instance per worker.
pub struct Summarizer {
    encoder: InputEncoder,
    backend: Box<dyn Seq2SeqBackend>,
    observer: Box<dyn PredictionObserver>,
    params: GenerationParameters,
}

impl Summarizer {
    /// Load the tokenizer and model named by `config`
    pub fn new(config: &ModelConfig, runtime: &RuntimeConfig) -> Result<Self> {
        let params = SUMMARY_GENERATION;
        let tokenizer_path = config.tokenizer_path();
        let model_path = config.model_path();

        let encoder = InputEncoder::from_path(&tokenizer_path, params.max_input_length)?;
        let artifacts = ModelArtifacts::locate(&tokenizer_path, &model_path)?;
        let backend = backend::load(&artifacts, runtime)?;

        info!(
            "Summarizer ready: {} model from {}",
            artifacts.architecture,
            model_path.display()
        );

        Ok(Self::with_backend(encoder, backend))
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.model, &config.runtime)
    }

    /// Load using the configuration file at its default location
    pub fn from_default_config() -> Result<Self> {
        Self::from_app_config(&AppConfig::load()?)
    }

    /// Assemble a summarizer from an already-loaded encoder and backend
    pub fn with_backend(encoder: InputEncoder, backend: Box<dyn Seq2SeqBackend>) -> Self {
        Self {
            encoder,
            backend,
            observer: Box::new(TracingObserver),
            params: SUMMARY_GENERATION,
        }
    }

    pub fn with_observer(mut self, observer: impl PredictionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn architecture(&self) -> ModelArchitecture {
        self.backend.architecture()
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Summarize `text`
    pub fn predict(&mut self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::generation(GenerationStage::Input, "input text is empty"));
        }

        let started = Instant::now();
        self.observer.on_input(text);

        let input = self.encoder.encode(text)?;
        if input.truncated {
            warn!(
                "Input exceeds {} tokens and was truncated",
                self.params.max_input_length
            );
        }
        debug!(attended = input.attended_len(), width = input.len(), "Tokenized input");

        let sequences = self.backend.generate(&input, &self.params)?;
        let best = sequences.first().ok_or_else(|| {
            Error::generation(GenerationStage::Generate, "model returned no sequences")
        })?;

        let summary = self.encoder.decode(best)?.trim().to_string();

        self.observer.on_summary(&summary);
        self.observer.on_complete(started.elapsed());

        Ok(summary)
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("architecture", &self.architecture())
            .field("params", &self.params)
            .finish()
    }
}
