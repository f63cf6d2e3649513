// LLM prompt templates for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::fill_template;
use crate::models::analysis::AnalysisResult;

/// Resume regeneration prompt template.
/// Replace: {resume_text}, {job_description}, {missing_keywords},
///          {skill_gap_analysis}, {template_text}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Your task is to create a new, enhanced resume by rewriting the user's original resume.
You will be given the user's original resume, a job description, an analysis of skill gaps, and a resume template for structure.
Your goal is to rewrite the resume to:
1. Incorporate the "missing keywords" and address the "skill gap analysis".
2. Tailor the experience and summary to the specific job description.
3. Maintain the user's original experience, but rephrase it professionally using action verbs and quantifiable results.
4. Structure the output to follow the provided template's sections.
5. Return ONLY a valid JSON object. Do not add any introductory text, explanations, or markdown formatting.

The JSON output must be strictly structured as follows:
{
  "contact": { "name": "...", "email": "...", "phone": "...", "linkedin": "..." },
  "summary": "A 2-3 sentence professional summary tailored to the job.",
  "experience": [
    { "title": "...", "company": "...", "location": "...", "dates": "...", "description": ["bullet point 1", "bullet point 2"] }
  ],
  "education": [
    { "institution": "...", "degree": "...", "location": "...", "dates": "..." }
  ],
  "skills": ["Skill 1", "Skill 2", "Relevant Technology"],
  "projects": [
    { "title": "...", "description": "..." }
  ]
}

If a section (like "projects") is not present in the original resume or template, you may omit it from the JSON.

---
ORIGINAL RESUME TEXT:
{resume_text}
---
JOB DESCRIPTION:
{job_description}
---
ANALYSIS (Gaps to fill):
Missing Keywords: {missing_keywords}
Skill Gap Analysis: {skill_gap_analysis}
---
RESUME TEMPLATE (for structure and section headers):
{template_text}
---
"#;

/// Renders the regeneration prompt. Missing analysis fields render as `[]`
/// and an empty string.
pub fn build_generation_prompt(
    resume_text: &str,
    job_description: &str,
    analysis: &AnalysisResult,
    template_text: &str,
) -> String {
    // Serializing a slice of strings cannot fail.
    let missing_keywords =
        serde_json::to_string(analysis.missing_keywords()).unwrap_or_else(|_| "[]".to_string());

    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("job_description", job_description),
            ("missing_keywords", &missing_keywords),
            ("skill_gap_analysis", analysis.skill_gap_analysis()),
            ("template_text", template_text),
        ],
    )
}
