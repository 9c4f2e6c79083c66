//! Extraction of presentation-ready insights from stored section text.
//!
//! Every function here is a total, pure function of its input text: parsing
//! never fails, it returns fewer (possibly zero) entries instead. An empty
//! result is the caller's placeholder state, not an error, and re-running an
//! extraction over the same text yields the same output.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::report::{AnalysisReport, SectionResult};

// ───────────────────────── line filters ─────────────────────────

/// Phrases the models emit in place of absent data. A line containing one
/// carries no information and is dropped wherever bullet text is collected.
const SKIP_PHRASES: [&str; 4] = [
    "not applicable",
    "not provided",
    "no data",
    "details missing",
];

const MAX_KEY_POINTS: usize = 4;
const MAX_RECOMMENDATIONS: usize = 3;

/// Sentence substituted when a summary yields no recommendations tail.
pub const NO_RECOMMENDATIONS_FALLBACK: &str = "No specific recommendations provided.";

fn is_placeholder_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    SKIP_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

// ───────────────────────── line patterns ─────────────────────────

// Lead-ins that mark a line as a key point: a bold numbered heading, a star
// bullet, or a bold word at line start.
static KEY_POINT_LEAD_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*[0-9]+\.|^\*\s|^\*\*[A-Za-z]").unwrap());

static ORDINAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

// Skills block: bold header captured up to the next bold marker, else a bare
// label captured up to the next blank line. Both case-insensitive.
static SKILLS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\*\*technical skills\*\*(.*?)(?:\*\*|$)").unwrap());
static SKILLS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)technical skills:?(.*?)(?:\n\n|$)").unwrap());

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());
static SKILL_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*-]\s*|^\d+\.\s*").unwrap());

// Name/context separators, split at the first occurrence only.
static SKILL_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"—| - |:").unwrap());

/// Legacy bold category labels, matched case-sensitively and merged in this
/// fixed order when the primary pass finds nothing.
const FALLBACK_CATEGORIES: [&str; 3] = [
    "Programming Languages",
    "Frontend Development",
    "Backend Development",
];

static CATEGORY_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    FALLBACK_CATEGORIES
        .iter()
        .map(|category| Regex::new(&format!(r"\*\*{category}:\*\*([^*]+)")).unwrap())
        .collect()
});

// ───────────────────────── extraction ─────────────────────────

/// One skill tag pulled from the skills summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    pub context: Option<String>,
}

/// Derives the recommendations text carried on a section result: the tail of
/// the summary after the first `"4."` (the numbered suggestions heading),
/// else after `"Suggestions"`, else a fixed fallback sentence. An empty split
/// segment falls through to the next delimiter.
pub fn recommendations_text(summary: &str) -> String {
    let tail = summary
        .split("4.")
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .or_else(|| {
            summary
                .split("Suggestions")
                .nth(1)
                .filter(|segment| !segment.is_empty())
        })
        .unwrap_or("");

    let trimmed = tail.trim();
    if trimmed.is_empty() {
        NO_RECOMMENDATIONS_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Pulls up to four observation bullets from a section summary, in source
/// order. Bold, bullet, and number markers are stripped; placeholder lines
/// are dropped.
pub fn extract_key_points(summary: &str) -> Vec<String> {
    let mut points = Vec::new();
    for line in summary.lines() {
        if !KEY_POINT_LEAD_IN.is_match(line) && !line.contains("* **") {
            continue;
        }
        let cleaned = clean_key_point(line);
        if cleaned.is_empty() || is_placeholder_line(&cleaned) {
            continue;
        }
        points.push(cleaned);
        if points.len() == MAX_KEY_POINTS {
            break;
        }
    }
    points
}

fn clean_key_point(line: &str) -> String {
    let without_bold = line.replace("**", "");
    let without_bullet = without_bold.strip_prefix("* ").unwrap_or(&without_bold);
    ORDINAL_PREFIX.replace(without_bullet, "").trim().to_string()
}

/// Pulls up to three action bullets from a recommendations text. Only
/// bold-bullet lines (`* **`) qualify; the lead marker is stripped at line
/// start and residual bold markers everywhere.
pub fn extract_recommendations(recommendations: &str) -> Vec<String> {
    recommendations
        .lines()
        .filter(|line| line.contains("* **"))
        .map(clean_recommendation)
        .filter(|rec| !rec.is_empty())
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

fn clean_recommendation(line: &str) -> String {
    let without_lead = line.strip_prefix("* **").unwrap_or(line);
    without_lead.replace("**", "").trim().to_string()
}

/// Pulls the deduplicated technical skill tags from the skills summary.
///
/// The primary pass reads bullet lines out of a "Technical Skills" block; if
/// neither header form is present the whole text is scanned and the line
/// filters decide. When the primary pass yields nothing, a fallback pass
/// reads comma-separated values from the legacy bold category labels.
/// Deduplication is case-insensitive on the name, first occurrence wins.
pub fn extract_skills(summary: &str) -> Vec<ExtractedSkill> {
    let mut skills = primary_skill_pass(summary);
    if skills.is_empty() {
        skills = category_skill_pass(summary);
    }

    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|skill| seen.insert(skill.name.to_lowercase()))
        .collect()
}

fn primary_skill_pass(summary: &str) -> Vec<ExtractedSkill> {
    skills_block(summary)
        .lines()
        .map(str::trim)
        .filter(|line| is_skill_candidate(line))
        .filter_map(parse_skill_line)
        .collect()
}

fn skills_block(summary: &str) -> &str {
    if let Some(captures) = SKILLS_BLOCK.captures(summary) {
        return captures.get(1).map_or("", |block| block.as_str());
    }
    if let Some(captures) = SKILLS_LABEL.captures(summary) {
        return captures.get(1).map_or("", |block| block.as_str());
    }
    // No recognizable header; scan everything and let the line filters decide.
    summary
}

fn is_skill_candidate(line: &str) -> bool {
    (line.starts_with('*') || line.starts_with('-') || NUMBERED_LINE.is_match(line))
        && !line.to_lowercase().contains("technical skills")
}

fn parse_skill_line(line: &str) -> Option<ExtractedSkill> {
    let stripped = SKILL_MARKER.replace(line, "");
    let stripped = stripped.trim();
    let lowered = stripped.to_lowercase();
    if stripped.is_empty() || lowered == "none" || lowered == "n/a" {
        return None;
    }
    if is_placeholder_line(stripped) {
        return None;
    }

    let mut parts = SKILL_SEPARATOR.splitn(stripped, 2);
    let name = parts.next().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return None;
    }
    let context = parts
        .next()
        .map(str::trim)
        .filter(|context| !context.is_empty() && *context != name)
        .map(|context| context.to_string());

    Some(ExtractedSkill { name, context })
}

fn category_skill_pass(summary: &str) -> Vec<ExtractedSkill> {
    let mut skills = Vec::new();
    for pattern in CATEGORY_BLOCKS.iter() {
        if let Some(captures) = pattern.captures(summary) {
            let values = captures.get(1).map_or("", |block| block.as_str());
            for value in values.split(',') {
                let name = value.trim();
                if !name.is_empty() {
                    skills.push(ExtractedSkill {
                        name: name.to_string(),
                        context: None,
                    });
                }
            }
        }
    }
    skills
}

// ───────────────────────── insight views ─────────────────────────

/// Presentation-ready view of one section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionInsights {
    pub key_points: Vec<String>,
    pub recommendations: Vec<String>,
    pub score: u32,
}

/// Presentation-ready view of a whole report, derived on read.
#[derive(Debug, Clone, Serialize)]
pub struct ReportInsights {
    pub skills: SectionInsights,
    pub experience: SectionInsights,
    pub education: SectionInsights,
    pub technical_skills: Vec<ExtractedSkill>,
}

/// Derives the insight view for a stored report.
pub fn report_insights(report: &AnalysisReport) -> ReportInsights {
    ReportInsights {
        skills: section_insights(&report.skills),
        experience: section_insights(&report.experience),
        education: section_insights(&report.education),
        technical_skills: extract_skills(&report.skills.summary),
    }
}

fn section_insights(section: &SectionResult) -> SectionInsights {
    SectionInsights {
        key_points: extract_key_points(&section.summary),
        recommendations: extract_recommendations(&section.recommendations_text),
        score: section.score,
    }
}
