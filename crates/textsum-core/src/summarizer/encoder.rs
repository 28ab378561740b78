use std::path::{Path, PathBuf};

use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationDirection,
    TruncationParams, TruncationStrategy,
};
use tracing::debug;

use crate::{Artifact, Error, GenerationStage, Result};

const TOKENIZER_FILE: &str = "tokenizer.json";
const PAD_TOKEN_CANDIDATES: [&str; 2] = ["<pad>", "[PAD]"];

/// Tokenized input of exactly `width` positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    pub input_ids: Vec<u32>,
    /// 1 for real tokens, 0 for padding
    pub attention_mask: Vec<u32>,
    /// Whether tokens past the width were dropped
    pub truncated: bool,
}

impl EncodedInput {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of attended (non-padding) positions
    pub fn attended_len(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

/// Fixed-width text encoder and best-sequence decoder over a pretrained tokenizer
pub struct InputEncoder {
    tokenizer: Tokenizer,
    width: usize,
}

impl InputEncoder {
    /// Load `tokenizer.json` from `path`, which may be the file or its directory
    pub fn from_path(path: &Path, width: usize) -> Result<Self> {
        let file = Self::resolve_file(path)?;
        let tokenizer = Tokenizer::from_file(&file)
            .map_err(|e| Error::artifact_load(Artifact::Tokenizer, &file, e.to_string()))?;

        debug!("Loaded tokenizer from {}", file.display());
        Self::from_tokenizer(tokenizer, width)
            .map_err(|e| Error::artifact_load(Artifact::Tokenizer, &file, e.to_string()))
    }

    /// Configure an already-loaded tokenizer for fixed-width encoding
    pub fn from_tokenizer(mut tokenizer: Tokenizer, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::Config("input width must be positive".to_string()));
        }

        let (pad_id, pad_token) = Self::pad_token(&tokenizer);

        tokenizer
            .with_truncation(Some(TruncationParams {
                direction: TruncationDirection::Right,
                max_length: width,
                strategy: TruncationStrategy::LongestFirst,
                stride: 0,
            }))
            .map_err(|e| Error::Config(format!("invalid truncation settings: {}", e)))?;

        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(width),
            direction: PaddingDirection::Right,
            pad_to_multiple_of: None,
            pad_id,
            pad_type_id: 0,
            pad_token,
        }));

        Ok(Self { tokenizer, width })
    }

    fn resolve_file(path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            return Err(Error::artifact_load(Artifact::Tokenizer, path, "path does not exist"));
        }

        let file = if path.is_dir() {
            path.join(TOKENIZER_FILE)
        } else {
            path.to_path_buf()
        };

        if !file.is_file() {
            return Err(Error::artifact_load(
                Artifact::Tokenizer,
                path,
                format!("missing {}", TOKENIZER_FILE),
            ));
        }

        Ok(file)
    }

    fn pad_token(tokenizer: &Tokenizer) -> (u32, String) {
        if let Some(padding) = tokenizer.get_padding() {
            return (padding.pad_id, padding.pad_token.clone());
        }

        PAD_TOKEN_CANDIDATES
            .iter()
            .find_map(|token| tokenizer.token_to_id(token).map(|id| (id, token.to_string())))
            .unwrap_or_else(|| (0, PAD_TOKEN_CANDIDATES[0].to_string()))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Encode `text` into exactly `width` ids plus attention mask
    pub fn encode(&self, text: &str) -> Result<EncodedInput> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::generation(GenerationStage::Tokenize, e.to_string()))?;

        let input_ids = encoding.get_ids().to_vec();
        let attention_mask = encoding.get_attention_mask().to_vec();

        if input_ids.len() != self.width || attention_mask.len() != self.width {
            return Err(Error::generation(
                GenerationStage::Tokenize,
                format!(
                    "expected {} positions, tokenizer produced {}",
                    self.width,
                    input_ids.len()
                ),
            ));
        }

        Ok(EncodedInput {
            input_ids,
            attention_mask,
            truncated: !encoding.get_overflowing().is_empty(),
        })
    }

    /// Decode a generated sequence, dropping special tokens
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| Error::generation(GenerationStage::Decode, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_tokenizer, write_tokenizer_dir, EOS_ID, PAD_ID};

    fn encoder(width: usize) -> InputEncoder {
        InputEncoder::from_tokenizer(test_tokenizer(), width).unwrap()
    }

    #[test]
    fn test_short_input_padded_to_width() {
        let encoded = encoder(1024).encode("Alice: Are you free tonight?").unwrap();

        assert_eq!(encoded.len(), 1024);
        assert_eq!(encoded.attention_mask.len(), 1024);
        // 7 word pieces plus the appended </s>
        assert_eq!(encoded.attended_len(), 8);
        assert_eq!(encoded.input_ids[7], EOS_ID);
        assert!(encoded.attention_mask[..8].iter().all(|&m| m == 1));
        assert!(encoded.attention_mask[8..].iter().all(|&m| m == 0));
        assert!(encoded.input_ids[8..].iter().all(|&id| id == PAD_ID));
        assert!(!encoded.truncated);
    }

    #[test]
    fn test_long_input_truncated_to_width() {
        let text = vec!["word"; 3000].join(" ");
        let encoded = encoder(1024).encode(&text).unwrap();

        assert_eq!(encoded.len(), 1024);
        assert_eq!(encoded.attended_len(), 1024);
        assert!(encoded.truncated);
    }

    #[test]
    fn test_exact_width_input() {
        // 15 words + </s> fills all 16 positions
        let text = vec!["word"; 15].join(" ");
        let encoded = encoder(16).encode(&text).unwrap();

        assert_eq!(encoded.len(), 16);
        assert_eq!(encoded.attended_len(), 16);
        assert!(!encoded.truncated);
    }

    #[test]
    fn test_decode_skips_special_tokens() {
        let enc = encoder(32);
        let encoded = enc.encode("Bob: Yes").unwrap();
        let decoded = enc.decode(&encoded.input_ids).unwrap();

        assert_eq!(decoded, "bob : yes");
        assert!(!decoded.contains("<pad>"));
        assert!(!decoded.contains("</s>"));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(InputEncoder::from_tokenizer(test_tokenizer(), 0).is_err());
    }

    #[test]
    fn test_from_path_accepts_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_tokenizer_dir(dir.path());

        assert_eq!(InputEncoder::from_path(dir.path(), 64).unwrap().width(), 64);
        assert_eq!(InputEncoder::from_path(&file, 64).unwrap().width(), 64);
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = InputEncoder::from_path(&dir.path().join("nope"), 64)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::ArtifactLoad { artifact: Artifact::Tokenizer, .. }
        ));

        // directory without tokenizer.json
        let err = InputEncoder::from_path(dir.path(), 64).err().unwrap();
        assert!(err.is_artifact_load());
    }

    #[test]
    fn test_from_path_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tokenizer.json"), "{ not json").unwrap();

        let err = InputEncoder::from_path(dir.path(), 64).err().unwrap();
        assert!(err.is_artifact_load());
    }
}
