use std::fmt;

/// Decoding settings applied to every `predict` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameters {
    /// Exponent applied to the hypothesis length when ranking beams; below 1.0 favours shorter output
    pub length_penalty: f64,
    pub num_beams: usize,
    /// Upper bound on generated tokens
    pub max_output_length: usize,
    /// Fixed width of the tokenized input
    pub max_input_length: usize,
}

pub const SUMMARY_GENERATION: GenerationParameters = GenerationParameters {
    length_penalty: 0.8,
    num_beams: 8,
    max_output_length: 128,
    max_input_length: 1024,
};

impl Default for GenerationParameters {
    fn default() -> Self {
        SUMMARY_GENERATION
    }
}

impl fmt::Display for GenerationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "num_beams={} length_penalty={} max_output_length={} max_input_length={}",
            self.num_beams, self.length_penalty, self.max_output_length, self.max_input_length
        )
    }
}
