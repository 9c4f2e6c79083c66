use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::extract::{report_insights, ReportInsights};
use crate::analysis::pipeline::run_analysis;
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::ReportStore;

/// Request body for CV analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub document: String,
    pub role: String,
}

/// Response from the analysis pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub report: AnalysisReport,
}

/// Latest stored report plus its derived insight views.
#[derive(Debug, Clone, Serialize)]
pub struct LatestReportResponse {
    pub report: AnalysisReport,
    pub insights: ReportInsights,
}

/// POST /api/v1/analyses
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if req.document.trim().is_empty() || req.role.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide all required information.".to_string(),
        ));
    }

    info!("Starting CV analysis for role '{}'", req.role);
    let report = run_analysis(&state.gateway, &req.document, &req.role)
        .await
        .map_err(|e| AppError::Llm(format!("Analysis pipeline failed: {e}")))?;

    // The store only ever sees fully aggregated reports.
    state.reports.submit(report.clone()).await;

    Ok(Json(AnalyzeResponse { report }))
}

/// GET /api/v1/analyses/latest
pub async fn handle_latest_report(
    State(state): State<AppState>,
) -> Result<Json<LatestReportResponse>, AppError> {
    let report = state
        .reports
        .latest()
        .await
        .ok_or_else(|| AppError::NotFound("No analysis report available yet".to_string()))?;

    let insights = report_insights(&report);
    Ok(Json(LatestReportResponse { report, insights }))
}
