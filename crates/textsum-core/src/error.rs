use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Which of the two loaded artifacts an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Tokenizer,
    Model,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Tokenizer => f.write_str("tokenizer"),
            Artifact::Model => f.write_str("model"),
        }
    }
}

/// Step of `predict` that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Input,
    Tokenize,
    Generate,
    Decode,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationStage::Input => "input validation",
            GenerationStage::Tokenize => "tokenization",
            GenerationStage::Generate => "generation",
            GenerationStage::Decode => "decoding",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load {artifact} from {}: {reason}", path.display())]
    ArtifactLoad {
        artifact: Artifact,
        path: PathBuf,
        reason: String,
    },

    #[error("Summary generation failed during {stage}: {reason}")]
    Generation {
        stage: GenerationStage,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn artifact_load(artifact: Artifact, path: &Path, reason: impl Into<String>) -> Self {
        Error::ArtifactLoad {
            artifact,
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn generation(stage: GenerationStage, reason: impl Into<String>) -> Self {
        Error::Generation {
            stage,
            reason: reason.into(),
        }
    }

    /// Raised while constructing a summarizer
    pub fn is_artifact_load(&self) -> bool {
        matches!(self, Error::ArtifactLoad { .. })
    }

    /// Raised by a `predict` call
    pub fn is_generation(&self) -> bool {
        matches!(self, Error::Generation { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
