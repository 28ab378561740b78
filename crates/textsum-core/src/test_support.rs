//! Fixtures shared by unit tests: a tiny word-level tokenizer and a scripted backend.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tokenizers::Tokenizer;

use crate::backend::{ModelArchitecture, Seq2SeqBackend};
use crate::summarizer::{EncodedInput, GenerationParameters};
use crate::Result;

pub const PAD_ID: u32 = 0;
pub const EOS_ID: u32 = 1;

/// Word-level tokenizer with lowercase normalization, whitespace splitting and a trailing `</s>`
pub const TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [
    {"id": 0, "content": "<pad>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 1, "content": "</s>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 2, "content": "<unk>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
  ],
  "normalizer": {"type": "Lowercase"},
  "pre_tokenizer": {"type": "Whitespace"},
  "post_processor": {
    "type": "TemplateProcessing",
    "single": [
      {"Sequence": {"id": "A", "type_id": 0}},
      {"SpecialToken": {"id": "</s>", "type_id": 0}}
    ],
    "pair": [
      {"Sequence": {"id": "A", "type_id": 0}},
      {"Sequence": {"id": "B", "type_id": 0}},
      {"SpecialToken": {"id": "</s>", "type_id": 0}}
    ],
    "special_tokens": {
      "</s>": {"id": "</s>", "ids": [1], "tokens": ["</s>"]}
    }
  },
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {
      "<pad>": 0, "</s>": 1, "<unk>": 2,
      "alice": 3, "bob": 4, "and": 5, "plan": 6, "to": 7, "meet": 8, "at": 9,
      "7": 10, ".": 11, ":": 12, "are": 13, "you": 14, "free": 15, "tonight": 16,
      "?": 17, "yes": 18, ",": 19, "let": 20, "'": 21, "s": 22, "word": 23
    },
    "unk_token": "<unk>"
  }
}"#;

pub fn test_tokenizer() -> Tokenizer {
    Tokenizer::from_str(TOKENIZER_JSON).unwrap()
}

/// Write `tokenizer.json` into `dir` and return its path
pub fn write_tokenizer_dir(dir: &Path) -> PathBuf {
    let file = dir.join("tokenizer.json");
    std::fs::write(&file, TOKENIZER_JSON).unwrap();
    file
}

/// Ids for "alice and bob plan to meet at 7 ." framed by special tokens
pub fn summary_ids() -> Vec<u32> {
    vec![PAD_ID, 3, 5, 4, 6, 7, 8, 9, 10, 11, EOS_ID, PAD_ID, PAD_ID]
}

/// Backend replaying canned outputs and recording what it was asked
pub struct ScriptedBackend {
    responses: VecDeque<Result<Vec<Vec<u32>>>>,
    repeat: Option<Vec<Vec<u32>>>,
    architecture: ModelArchitecture,
    calls: Arc<Mutex<Vec<(EncodedInput, GenerationParameters)>>>,
}

impl ScriptedBackend {
    /// Return `sequences` on every call
    pub fn repeating(sequences: Vec<Vec<u32>>) -> Self {
        Self {
            responses: VecDeque::new(),
            repeat: Some(sequences),
            architecture: ModelArchitecture::Pegasus,
            calls: Arc::default(),
        }
    }

    /// Return each response once, in order
    pub fn scripted(responses: Vec<Result<Vec<Vec<u32>>>>) -> Self {
        Self {
            responses: responses.into(),
            repeat: None,
            architecture: ModelArchitecture::Pegasus,
            calls: Arc::default(),
        }
    }

    pub fn with_architecture(mut self, architecture: ModelArchitecture) -> Self {
        self.architecture = architecture;
        self
    }

    /// Handle to the recorded calls, usable after the backend is moved into a summarizer
    pub fn calls(&self) -> Arc<Mutex<Vec<(EncodedInput, GenerationParameters)>>> {
        Arc::clone(&self.calls)
    }
}

impl Seq2SeqBackend for ScriptedBackend {
    fn architecture(&self) -> ModelArchitecture {
        self.architecture
    }

    fn generate(
        &mut self,
        input: &EncodedInput,
        params: &GenerationParameters,
    ) -> Result<Vec<Vec<u32>>> {
        self.calls.lock().unwrap().push((input.clone(), *params));
        match self.responses.pop_front() {
            Some(response) => response,
            None => Ok(self.repeat.clone().unwrap_or_default()),
        }
    }
}
