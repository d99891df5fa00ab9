pub mod classifier;
pub mod reconstruct;
pub mod similarity;
pub mod summary;

pub use classifier::*;
pub use reconstruct::*;
pub use similarity::*;
pub use summary::*;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::io::{append_result_rows, parse_chatlog_file};
use crate::llm::{build_survey_prompt, ChatClient};
use crate::models::ResultRow;

/// Configuration for a full analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub reconstruct: ReconstructConfig,
    pub summary: SummaryParseConfig,
}

/// Execute the offline analysis pipeline for one chat log:
///
/// 1. Load the conversation record
/// 2. Reconstruct question/answer pairs from the turn sequence
/// 3. Serialize the pairs and request a summary from the model
/// 4. Parse the free-form response back into rows
/// 5. Append the rows to the result table
///
/// A log with no reconstructable pairs is an error; a response the parser
/// cannot fully mine is not (rows degrade to empty fields).
pub async fn run_analysis(
    client: &ChatClient,
    input: &Path,
    out_csv: &Path,
    config: &AnalysisConfig,
) -> Result<Vec<ResultRow>> {
    let log = parse_chatlog_file(input).context("Failed to load chat log")?;
    info!(
        "Loaded {} turns, {} submodules",
        log.turns.len(),
        log.submodules.len()
    );

    let pairs = reconstruct_qa_pairs(&log, &config.reconstruct);
    if pairs.is_empty() {
        anyhow::bail!("No question/answer pairs found in {:?}", input);
    }
    info!("Reconstructed {} question/answer pairs", pairs.len());

    let prompt = build_survey_prompt(&pairs);
    let response = client
        .summarize_survey(&prompt)
        .await
        .context("Summarization request failed")?;
    debug!("Model output:\n{}", response);

    let rows = rows_from_response(&response, &pairs, &config.summary);
    append_result_rows(&rows, out_csv)?;
    info!("Appended {} rows to {:?}", rows.len(), out_csv);

    Ok(rows)
}
