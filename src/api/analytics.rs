//! Analytics API endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::analytics::AnalyticsSummary};

use super::context::{page_context, PageContext};

#[derive(Serialize, ToSchema)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
    pub context: PageContext,
}

/// Price analytics over all equipment
#[utoipa::path(
    get,
    path = "/analytics",
    tag = "analytics",
    responses(
        (status = 200, description = "Highlighted records, prices with fee, totals and group counts", body = AnalyticsResponse)
    )
)]
pub async fn get_summary(State(state): State<crate::AppState>) -> AppResult<Json<AnalyticsResponse>> {
    let summary = state.services.analytics.summary().await?;
    Ok(Json(AnalyticsResponse {
        summary,
        context: page_context("Аналитика", None),
    }))
}
