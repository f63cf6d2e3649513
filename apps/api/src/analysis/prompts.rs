// LLM prompt templates for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};

/// Analysis prompt template.
/// Replace: {json_only_instruction}, {job_description}, {resume_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"As an expert HR analyst and resume reviewer, your task is to analyze the following resume against the provided job description.
Provide a detailed analysis in a pure JSON format. The JSON object must contain the following keys:
- "overall_score": An integer score from 0 to 100 representing how well the resume matches the job description.
- "ats_friendliness_score": An integer score from 0 to 100 on how well the resume is structured for Applicant Tracking Systems (ATS). Consider factors like standard sections, clear headings, and parsable format.
- "ats_friendliness_feedback": A string with concrete suggestions on how to improve ATS compatibility.
- "matching_keywords": A list of important keywords and skills from the job description that ARE present in the resume. Only include terms that relate to the role itself, not incidental content about the company that is irrelevant to the resume.
- "missing_keywords": A list of important keywords and skills from the job description that ARE MISSING from the resume.
- "skill_gap_analysis": A string that elaborates on the missing skills and experiences, making them clear and explaining their importance for the role.
- "summary_and_suggestions": A brief string summarizing the resume's strengths and weaknesses and providing overall suggestions for improvement.

{json_only_instruction}

JOB DESCRIPTION:
---
{job_description}
---

RESUME TEXT:
---
{resume_text}
---
"#;

/// Renders the analysis prompt. Both inputs are embedded verbatim.
pub fn build_analysis_prompt(job_description: &str, resume_text: &str) -> String {
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    )
}
