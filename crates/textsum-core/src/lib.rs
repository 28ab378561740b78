pub mod backend;
pub mod config;
pub mod error;
pub mod summarizer;

#[cfg(test)]
mod test_support;

pub use backend::{ModelArchitecture, ModelArtifacts, Seq2SeqBackend};
pub use config::{AppConfig, DeviceSelection, ModelConfig, RuntimeConfig};
pub use error::{Artifact, Error, GenerationStage, Result};
pub use summarizer::{
    ConsoleObserver, EncodedInput, GenerationParameters, InputEncoder, NoopObserver,
    PredictionObserver, Summarizer, TracingObserver, SUMMARY_GENERATION,
};
