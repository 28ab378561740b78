use rust_bert::bart::BartGenerator;
use rust_bert::pegasus::PegasusConditionalGenerator;
use rust_bert::pipelines::common::ModelResource;
use rust_bert::pipelines::generation_utils::{GenerateConfig, GenerateOptions, LanguageGenerator};
use rust_bert::resources::{LocalResource, ResourceProvider};
use rust_bert::t5::T5Generator;
use tch::{Device, Tensor};
use tracing::{debug, info};

use super::{to_token_ids, ModelArchitecture, ModelArtifacts, Seq2SeqBackend};
use crate::config::DeviceSelection;
use crate::summarizer::{EncodedInput, GenerationParameters, SUMMARY_GENERATION};
use crate::{Artifact, Error, GenerationStage, Result};

enum Generator {
    Bart(BartGenerator),
    Pegasus(PegasusConditionalGenerator),
    T5(T5Generator),
}

/// rust-bert conditional generator running on libtorch
pub struct TorchBackend {
    generator: Generator,
    architecture: ModelArchitecture,
    device: Device,
}

fn local(path: &std::path::Path) -> Box<dyn ResourceProvider + Send> {
    Box::new(LocalResource::from(path.to_path_buf()))
}

fn resolve_device(selection: DeviceSelection, artifacts: &ModelArtifacts) -> Result<Device> {
    match selection {
        DeviceSelection::Auto => Ok(Device::cuda_if_available()),
        DeviceSelection::Cpu => Ok(Device::Cpu),
        DeviceSelection::Cuda(index) => {
            if tch::Cuda::is_available() && index < tch::Cuda::device_count() as usize {
                Ok(Device::Cuda(index))
            } else {
                Err(Error::artifact_load(
                    Artifact::Model,
                    &artifacts.weights,
                    format!("CUDA device {} is not available", index),
                ))
            }
        }
    }
}

impl TorchBackend {
    pub fn load(artifacts: &ModelArtifacts, selection: DeviceSelection) -> Result<Self> {
        let device = resolve_device(selection, artifacts)?;
        let params = SUMMARY_GENERATION;

        // Sampling and n-gram blocking off: plain beam search
        let config = GenerateConfig {
            model_resource: ModelResource::Torch(local(&artifacts.weights)),
            config_resource: local(&artifacts.config),
            vocab_resource: local(&artifacts.vocab),
            merges_resource: artifacts.merges.as_deref().map(local),
            min_length: 0,
            max_length: Some(params.max_output_length as i64),
            do_sample: false,
            early_stopping: false,
            num_beams: params.num_beams as i64,
            length_penalty: params.length_penalty,
            repetition_penalty: 1.0,
            no_repeat_ngram_size: 0,
            num_return_sequences: 1,
            device,
            ..Default::default()
        };

        let load_err = |e: rust_bert::RustBertError| {
            Error::artifact_load(Artifact::Model, &artifacts.weights, e.to_string())
        };

        let generator = match artifacts.architecture {
            ModelArchitecture::Bart => {
                Generator::Bart(BartGenerator::new(config).map_err(load_err)?)
            }
            ModelArchitecture::Pegasus => {
                Generator::Pegasus(PegasusConditionalGenerator::new(config).map_err(load_err)?)
            }
            ModelArchitecture::T5 => Generator::T5(T5Generator::new(config).map_err(load_err)?),
        };

        info!(
            "Loaded {} model from {} on {:?}",
            artifacts.architecture,
            artifacts.weights.display(),
            device
        );

        Ok(Self {
            generator,
            architecture: artifacts.architecture,
            device,
        })
    }

    fn to_tensor(&self, values: &[u32]) -> Tensor {
        let values: Vec<i64> = values.iter().map(|&v| i64::from(v)).collect();
        Tensor::from_slice(&values).unsqueeze(0).to(self.device)
    }
}

impl Seq2SeqBackend for TorchBackend {
    fn architecture(&self) -> ModelArchitecture {
        self.architecture
    }

    fn generate(
        &mut self,
        input: &EncodedInput,
        params: &GenerationParameters,
    ) -> Result<Vec<Vec<u32>>> {
        let input_ids = self.to_tensor(&input.input_ids);
        let attention_mask = self.to_tensor(&input.attention_mask);

        let options = GenerateOptions {
            max_length: Some(params.max_output_length as i64),
            num_beams: Some(params.num_beams as i64),
            length_penalty: Some(params.length_penalty),
            do_sample: Some(false),
            num_return_sequences: Some(1),
            ..Default::default()
        };

        let outputs = match &self.generator {
            Generator::Bart(g) => {
                g.generate_from_ids_and_past(input_ids, Some(attention_mask), Some(options))
            }
            Generator::Pegasus(g) => {
                g.generate_from_ids_and_past(input_ids, Some(attention_mask), Some(options))
            }
            Generator::T5(g) => {
                g.generate_from_ids_and_past(input_ids, Some(attention_mask), Some(options))
            }
        }
        .map_err(|e| Error::generation(GenerationStage::Generate, e.to_string()))?;

        debug!(sequences = outputs.len(), "Beam search finished");

        outputs
            .into_iter()
            .map(|output| to_token_ids(output.indices))
            .collect()
    }
}

