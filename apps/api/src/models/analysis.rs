use serde_json::Value;

use crate::models::{str_field, str_list_field};

pub const NOT_AVAILABLE: &str = "N/A";

/// The analysis reply. Every field is optional: the backend output is only
/// guaranteed to be valid JSON, not to follow the requested schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    pub overall_score: Option<i64>,
    pub ats_friendliness_score: Option<i64>,
    pub ats_friendliness_feedback: Option<String>,
    pub matching_keywords: Option<Vec<String>>,
    pub missing_keywords: Option<Vec<String>>,
    pub skill_gap_analysis: Option<String>,
    pub summary_and_suggestions: Option<String>,
}

impl AnalysisResult {
    /// Builds a result from an arbitrary JSON value. Keys with an unexpected
    /// type are treated as absent rather than failing the whole reply.
    pub fn from_value(value: &Value) -> Self {
        Self {
            overall_score: score_field(value, "overall_score"),
            ats_friendliness_score: score_field(value, "ats_friendliness_score"),
            ats_friendliness_feedback: str_field(value, "ats_friendliness_feedback"),
            matching_keywords: str_list_field(value, "matching_keywords"),
            missing_keywords: str_list_field(value, "missing_keywords"),
            skill_gap_analysis: str_field(value, "skill_gap_analysis"),
            summary_and_suggestions: str_field(value, "summary_and_suggestions"),
        }
    }

    pub fn overall_score(&self) -> i64 {
        self.overall_score.unwrap_or(0)
    }

    pub fn ats_friendliness_score(&self) -> i64 {
        self.ats_friendliness_score.unwrap_or(0)
    }

    pub fn matching_keywords(&self) -> &[String] {
        self.matching_keywords.as_deref().unwrap_or_default()
    }

    pub fn missing_keywords(&self) -> &[String] {
        self.missing_keywords.as_deref().unwrap_or_default()
    }

    pub fn skill_gap_analysis(&self) -> &str {
        self.skill_gap_analysis.as_deref().unwrap_or_default()
    }
}

/// Scores are stored as reported. Fractional values are rounded; range is not
/// enforced here, see `score_fraction` for display.
fn score_field(obj: &Value, key: &str) -> Option<i64> {
    let v = obj.get(key)?;
    v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
}

/// Maps a 0–100 score onto 0.0–1.0 for progress display, clamping outliers.
pub fn score_fraction(score: i64) -> f64 {
    (score as f64 / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_all_recognized_keys() {
        let value = json!({
            "overall_score": 80,
            "ats_friendliness_score": 65,
            "ats_friendliness_feedback": "Use standard headings",
            "matching_keywords": ["Rust", "Kubernetes"],
            "missing_keywords": ["Terraform"],
            "skill_gap_analysis": "No IaC experience",
            "summary_and_suggestions": "Strong backend profile"
        });
        let result = AnalysisResult::from_value(&value);
        assert_eq!(result.overall_score, Some(80));
        assert_eq!(result.ats_friendliness_score, Some(65));
        assert_eq!(result.matching_keywords(), ["Rust", "Kubernetes"]);
        assert_eq!(result.missing_keywords(), ["Terraform"]);
        assert_eq!(result.skill_gap_analysis(), "No IaC experience");
    }

    #[test]
    fn test_from_value_defaults_missing_keys() {
        let result = AnalysisResult::from_value(&json!({}));
        assert_eq!(result, AnalysisResult::default());
        assert_eq!(result.overall_score(), 0);
        assert!(result.missing_keywords().is_empty());
        assert_eq!(result.skill_gap_analysis(), "");
    }

    #[test]
    fn test_from_value_treats_wrong_types_as_absent() {
        let value = json!({
            "overall_score": "eighty",
            "matching_keywords": "Rust",
            "missing_keywords": ["Go", 7, null, "SQL"],
            "skill_gap_analysis": {"nested": true}
        });
        let result = AnalysisResult::from_value(&value);
        assert_eq!(result.overall_score, None);
        assert_eq!(result.matching_keywords, None);
        assert_eq!(result.missing_keywords(), ["Go", "SQL"]);
        assert_eq!(result.skill_gap_analysis, None);
    }

    #[test]
    fn test_from_value_preserves_out_of_range_scores() {
        let result = AnalysisResult::from_value(&json!({"overall_score": 140, "ats_friendliness_score": 72.6}));
        assert_eq!(result.overall_score(), 140);
        assert_eq!(result.ats_friendliness_score(), 73);
    }

    #[test]
    fn test_score_fraction_clamps() {
        assert_eq!(score_fraction(50), 0.5);
        assert_eq!(score_fraction(140), 1.0);
        assert_eq!(score_fraction(-5), 0.0);
    }

    #[test]
    fn test_from_value_on_non_object_is_empty() {
        assert_eq!(AnalysisResult::from_value(&json!([1, 2, 3])), AnalysisResult::default());
    }
}
