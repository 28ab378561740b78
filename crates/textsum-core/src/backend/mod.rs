#[cfg(feature = "torch")]
mod torch;

#[cfg(feature = "torch")]
pub use torch::TorchBackend;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::RuntimeConfig;
use crate::summarizer::{EncodedInput, GenerationParameters};
use crate::{Artifact, Error, GenerationStage, Result};

const MODEL_CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "rust_model.ot";

/// A loaded generative sequence model
pub trait Seq2SeqBackend: Send {
    fn architecture(&self) -> ModelArchitecture;

    /// Run beam search over `input`, returning candidate id sequences best first
    fn generate(
        &mut self,
        input: &EncodedInput,
        params: &GenerationParameters,
    ) -> Result<Vec<Vec<u32>>>;
}

/// Encoder-decoder families that can back the summarizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArchitecture {
    Bart,
    Pegasus,
    T5,
}

#[derive(Deserialize)]
struct ModelTypeField {
    model_type: Option<String>,
}

impl ModelArchitecture {
    pub fn from_model_type(model_type: &str) -> Option<Self> {
        match model_type.to_ascii_lowercase().as_str() {
            "bart" => Some(Self::Bart),
            "pegasus" => Some(Self::Pegasus),
            "t5" => Some(Self::T5),
            _ => None,
        }
    }

    /// Read `model_type` from a model `config.json`
    pub fn detect(config_file: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_file)
            .map_err(|e| Error::artifact_load(Artifact::Model, config_file, e.to_string()))?;
        let field: ModelTypeField = serde_json::from_str(&content).map_err(|e| {
            let reason = format!("invalid config.json: {}", e);
            Error::artifact_load(Artifact::Model, config_file, reason)
        })?;

        let model_type = field.model_type.ok_or_else(|| {
            Error::artifact_load(Artifact::Model, config_file, "config.json has no model_type")
        })?;

        Self::from_model_type(&model_type).ok_or_else(|| {
            Error::artifact_load(
                Artifact::Model,
                config_file,
                format!(
                    "architecture '{}' cannot perform summarization. Use a BART, Pegasus or T5 model.",
                    model_type
                ),
            )
        })
    }

    /// Vocabulary files the architecture expects next to `tokenizer.json`
    pub fn vocab_files(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Bart => ("vocab.json", Some("merges.txt")),
            Self::Pegasus | Self::T5 => ("spiece.model", None),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bart => "bart",
            Self::Pegasus => "pegasus",
            Self::T5 => "t5",
        }
    }
}

impl fmt::Display for ModelArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Files resolved from the tokenizer and model directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub architecture: ModelArchitecture,
    pub config: PathBuf,
    pub weights: PathBuf,
    pub vocab: PathBuf,
    pub merges: Option<PathBuf>,
}

impl ModelArtifacts {
    pub fn locate(tokenizer_path: &Path, model_path: &Path) -> Result<Self> {
        if !model_path.is_dir() {
            let reason = if model_path.exists() {
                "not a directory"
            } else {
                "path does not exist"
            };
            return Err(Error::artifact_load(Artifact::Model, model_path, reason));
        }

        let config = require_file(Artifact::Model, model_path, MODEL_CONFIG_FILE)?;
        let architecture = ModelArchitecture::detect(&config)?;
        let weights = require_file(Artifact::Model, model_path, WEIGHTS_FILE)?;

        // tokenizer_path may point at tokenizer.json itself
        let tokenizer_dir = if tokenizer_path.is_file() {
            tokenizer_path.parent().unwrap_or(tokenizer_path)
        } else {
            tokenizer_path
        };
        let (vocab_name, merges_name) = architecture.vocab_files();
        let vocab = require_file(Artifact::Tokenizer, tokenizer_dir, vocab_name)?;
        let merges = merges_name
            .map(|name| require_file(Artifact::Tokenizer, tokenizer_dir, name))
            .transpose()?;

        Ok(Self {
            architecture,
            config,
            weights,
            vocab,
            merges,
        })
    }
}

fn require_file(artifact: Artifact, dir: &Path, name: &str) -> Result<PathBuf> {
    let file = dir.join(name);
    if file.is_file() {
        Ok(file)
    } else {
        Err(Error::artifact_load(artifact, dir, format!("missing {}", name)))
    }
}

/// Convert generated indices to tokenizer ids, rejecting values outside the u32 range
#[cfg_attr(not(feature = "torch"), allow(dead_code))]
pub(crate) fn to_token_ids(indices: Vec<i64>) -> Result<Vec<u32>> {
    indices
        .into_iter()
        .map(|id| {
            u32::try_from(id).map_err(|_| {
                Error::generation(GenerationStage::Decode, format!("invalid token id {}", id))
            })
        })
        .collect()
}

/// Load the model backend compiled into this build
#[cfg(feature = "torch")]
pub fn load(
    artifacts: &ModelArtifacts,
    runtime: &RuntimeConfig,
) -> Result<Box<dyn Seq2SeqBackend>> {
    let device = runtime.device()?;
    Ok(Box::new(TorchBackend::load(artifacts, device)?))
}

#[cfg(not(feature = "torch"))]
pub fn load(
    artifacts: &ModelArtifacts,
    _runtime: &RuntimeConfig,
) -> Result<Box<dyn Seq2SeqBackend>> {
    Err(Error::artifact_load(
        Artifact::Model,
        &artifacts.weights,
        "no model backend compiled in; rebuild with the `torch` feature",
    ))
}
