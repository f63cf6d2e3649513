//! Analysis — scores a resume against a job description with one LLM call.

pub mod prompts;

use tracing::info;

use crate::analysis::prompts::build_analysis_prompt;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::models::analysis::AnalysisResult;

/// Runs the analysis prompt and reads the reply permissively.
pub async fn analyze_resume(
    llm: &dyn TextGenerator,
    job_description: &str,
    resume_text: &str,
) -> Result<AnalysisResult, GenerationError> {
    let prompt = build_analysis_prompt(job_description, resume_text);
    let reply = llm.generate(&prompt).await?;
    let result = AnalysisResult::from_value(&reply);
    info!(
        "Analysis complete: overall_score={:?}, missing_keywords={}",
        result.overall_score,
        result.missing_keywords().len()
    );
    Ok(result)
}
