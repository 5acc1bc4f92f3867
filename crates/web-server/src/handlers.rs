use crate::{error::AppError, AppState};
use analyzer::{AnalysisRequest, AnalysisResult};
use axum::{
    extract::{Multipart, State},
    Json,
};
use ingestion::values::parse_decimal;
use risk::PlanSummary;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansResponse {
    pub default_goal: Decimal,
    pub plans: Vec<PlanSummary>,
}

/// # POST /api/analysis
/// Multipart fields: `file` (operations export), `clientId`, `planGoal`.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn analyze_operations(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut client_id: Option<String> = None;
    let mut plan_goal: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => file = Some(field.bytes().await?.to_vec()),
            "clientId" => client_id = Some(field.text().await?),
            "planGoal" => plan_goal = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unexpected form field."),
        }
    }

    let file = file
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("file is required".to_string()))?;
    let client_id = client_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("clientId is required".to_string()))?;
    let goal = plan_goal
        .as_deref()
        .and_then(parse_decimal)
        .ok_or_else(|| AppError::InvalidRequest("planGoal must be a number".to_string()))?;

    tracing::info!(client_id = %client_id, bytes = file.len(), %goal, "Analysing operations export.");

    let analysis = state
        .analyzer
        .analyze(AnalysisRequest {
            file,
            client_id,
            goal,
        })
        .await?;

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

/// # GET /api/plans
/// The plan goal table with each tier's daily limits in currency.
pub async fn get_plans(State(state): State<Arc<AppState>>) -> Json<PlansResponse> {
    Json(PlansResponse {
        default_goal: state.plans.default_goal().value(),
        plans: state.plans.summaries(),
    })
}
