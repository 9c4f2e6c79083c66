//! Report data model for the three-section CV analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three analysis dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Skills,
    Experience,
    Education,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionKind::Skills => write!(f, "skills"),
            SectionKind::Experience => write!(f, "experience"),
            SectionKind::Education => write!(f, "education"),
        }
    }
}

/// Section weights in the overall score.
const SKILLS_WEIGHT: f64 = 0.4;
const EXPERIENCE_WEIGHT: f64 = 0.4;
const EDUCATION_WEIGHT: f64 = 0.2;

/// Per-section outcome: the verbatim model output, the recommendations text
/// derived from it, and the heuristic score (0–100).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResult {
    pub summary: String,
    pub recommendations_text: String,
    pub score: u32,
}

/// The aggregated report handed to the presentation collaborator.
/// Exists only once all three sections have succeeded; read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub skills: SectionResult,
    pub experience: SectionResult,
    pub education: SectionResult,
    pub overall_score: u32,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn section(&self, kind: SectionKind) -> &SectionResult {
        match kind {
            SectionKind::Skills => &self.skills,
            SectionKind::Experience => &self.experience,
            SectionKind::Education => &self.education,
        }
    }
}

/// Weighted overall score: 40% skills, 40% experience, 20% education,
/// rounded to the nearest integer.
pub fn overall_score(skills: u32, experience: u32, education: u32) -> u32 {
    (f64::from(skills) * SKILLS_WEIGHT
        + f64::from(experience) * EXPERIENCE_WEIGHT
        + f64::from(education) * EDUCATION_WEIGHT)
        .round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(score: u32) -> SectionResult {
        SectionResult {
            summary: "**Overview**\n* Solid".to_string(),
            recommendations_text: "No specific recommendations provided.".to_string(),
            score,
        }
    }

    #[test]
    fn test_overall_score_weighted_sum() {
        // round(0.4*80 + 0.4*70 + 0.2*50) = round(32 + 28 + 10) = 70
        assert_eq!(overall_score(80, 70, 50), 70);
    }

    #[test]
    fn test_overall_score_bounds() {
        assert_eq!(overall_score(0, 0, 0), 0);
        assert_eq!(overall_score(100, 100, 100), 100);
    }

    #[test]
    fn test_overall_score_matches_exact_arithmetic() {
        // 0.4s + 0.4e + 0.2d == (2s + 2e + d)/5, which never lands on a
        // .5 tie, so rounding is unambiguous and float error cannot flip it.
        for s in (0..=100).step_by(3) {
            for e in (0..=100).step_by(3) {
                for d in (0..=100).step_by(3) {
                    let exact = (2 * (2 * s + 2 * e + d) + 5) / 10;
                    assert_eq!(overall_score(s, e, d), exact, "s={s} e={e} d={d}");
                }
            }
        }
    }

    #[test]
    fn test_section_accessor_returns_matching_result() {
        let report = AnalysisReport {
            skills: section(80),
            experience: section(70),
            education: section(50),
            overall_score: 70,
            generated_at: Utc::now(),
        };
        assert_eq!(report.section(SectionKind::Skills).score, 80);
        assert_eq!(report.section(SectionKind::Experience).score, 70);
        assert_eq!(report.section(SectionKind::Education).score, 50);
    }

    #[test]
    fn test_report_serializes_and_deserializes() {
        let report = AnalysisReport {
            skills: section(80),
            experience: section(70),
            education: section(50),
            overall_score: 70,
            generated_at: Utc::now(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let recovered: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered.overall_score, 70);
        assert_eq!(recovered.skills.summary, report.skills.summary);
        assert_eq!(recovered.generated_at, report.generated_at);
    }

    #[test]
    fn test_section_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SectionKind::Education).unwrap(),
            r#""education""#
        );
        assert_eq!(SectionKind::Experience.to_string(), "experience");
    }
}
