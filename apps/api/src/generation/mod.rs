//! Generation — rewrites the resume for the job and a structural template.
//!
//! Flow: build_generation_prompt → LLM generate → GeneratedResume.
//! The raw reply is kept alongside the typed resume for preview.

pub mod prompts;

use serde_json::Value;
use tracing::info;

use crate::generation::prompts::build_generation_prompt;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::models::analysis::AnalysisResult;
use crate::models::resume::GeneratedResume;

/// Output of one regeneration call.
#[derive(Debug, Clone)]
pub struct Regenerated {
    pub raw: Value,
    pub resume: GeneratedResume,
}

pub async fn regenerate_resume(
    llm: &dyn TextGenerator,
    resume_text: &str,
    job_description: &str,
    analysis: &AnalysisResult,
    template_text: &str,
) -> Result<Regenerated, GenerationError> {
    let prompt = build_generation_prompt(resume_text, job_description, analysis, template_text);
    let raw = llm.generate(&prompt).await?;
    let resume = GeneratedResume::from_value(&raw);
    info!(
        "Regenerated resume: contact={}, summary={}, experience={}, education={}, skills={}, projects={}",
        resume.contact.is_some(),
        resume.summary.is_some(),
        resume.experience.is_some(),
        resume.education.is_some(),
        resume.skills.is_some(),
        resume.projects.is_some(),
    );
    Ok(Regenerated { raw, resume })
}
