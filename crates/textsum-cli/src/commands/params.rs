use anyhow::Result;

use textsum_core::SUMMARY_GENERATION;

pub fn run() -> Result<()> {
    let params = SUMMARY_GENERATION;

    println!("Generation parameters:\n");
    println!("  num_beams          {}", params.num_beams);
    println!("  length_penalty     {}", params.length_penalty);
    println!("  max_output_length  {}", params.max_output_length);
    println!("  max_input_length   {}", params.max_input_length);

    Ok(())
}
