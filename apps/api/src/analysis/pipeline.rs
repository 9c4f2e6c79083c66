//! CV Analysis — orchestrates the full analysis pipeline.
//!
//! Flow: sanitize → skills call → pause → experience call → pause →
//!       education call → score + derive → aggregate report.
//!
//! Strictly sequential by design: the three generation calls share one
//! external rate limit, so there is no fan-out across sections.

use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::analysis::extract::recommendations_text;
use crate::analysis::prompts::build_prompt;
use crate::analysis::report::{overall_score, AnalysisReport, SectionKind, SectionResult};
use crate::analysis::sanitize::sanitize_document;
use crate::analysis::scoring::score_section;
use crate::llm_client::gateway::Gateway;
use crate::llm_client::GenAiError;

/// Fixed pause between section calls, inserted to stay under the shared
/// service rate limit. A pacing choice, not a retry.
const SECTION_PACING: Duration = Duration::from_secs(1);

// ────────────────────────────────────────────────────────────────────────────
// Analysis pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the three-section analysis over one document.
///
/// Steps:
/// 1. sanitize_document() → normalized text
/// 2. skills section call
/// 3. fixed 1s pause
/// 4. experience section call
/// 5. fixed 1s pause
/// 6. education section call
/// 7. aggregate → AnalysisReport (overall score + timestamp)
///
/// Any unrecovered service error aborts the whole run — sections are not
/// independently salvageable, and no partial report is ever returned.
pub async fn run_analysis(
    gateway: &Gateway,
    document: &str,
    role: &str,
) -> Result<AnalysisReport, GenAiError> {
    // Step 1: Normalize the raw document text
    let content = sanitize_document(document);
    debug!("Sanitized document to {} chars", content.len());

    // Steps 2-6: One call per section, paced to respect the rate limit
    let skills = analyze_section(gateway, SectionKind::Skills, &content, role).await?;
    sleep(SECTION_PACING).await;
    let experience = analyze_section(gateway, SectionKind::Experience, &content, role).await?;
    sleep(SECTION_PACING).await;
    let education = analyze_section(gateway, SectionKind::Education, &content, role).await?;

    // Step 7: Aggregate
    let report = AnalysisReport {
        overall_score: overall_score(skills.score, experience.score, education.score),
        skills,
        experience,
        education,
        generated_at: Utc::now(),
    };
    info!("Analysis complete: overall score {}", report.overall_score);
    Ok(report)
}

/// One section: build the prompt, call the gateway, score the reply and
/// derive the recommendations text. The summary is stored verbatim.
async fn analyze_section(
    gateway: &Gateway,
    kind: SectionKind,
    content: &str,
    role: &str,
) -> Result<SectionResult, GenAiError> {
    info!("Analyzing {} section", kind);
    let prompt = build_prompt(kind, content, role);
    let summary = gateway.call(&prompt).await?;

    let score = score_section(&summary);
    debug!("{} section scored {}", kind, score);
    Ok(SectionResult {
        recommendations_text: recommendations_text(&summary),
        summary,
        score,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
