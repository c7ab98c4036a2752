use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    funnel::{
        dto::{EmptyFunnel, FunnelData, FunnelQuery},
        report::FunnelOutcome,
        services::{self, no_data_message, zero_headcount_message},
    },
    state::AppState,
};

pub fn funnel_routes() -> Router<AppState> {
    Router::new()
        .route("/company-funnel", get(company_funnel))
        .route("/company-funnel/data", get(company_funnel_data))
}

#[instrument(skip(state))]
pub async fn company_funnel(
    State(state): State<AppState>,
    Query(query): Query<FunnelQuery>,
) -> Result<Html<String>, AppError> {
    let outcome = services::build_funnel(state.funnel.as_ref(), &query.company_name).await?;
    Ok(Html(services::render_funnel(&outcome)?))
}

#[instrument(skip(state))]
pub async fn company_funnel_data(
    State(state): State<AppState>,
    Query(query): Query<FunnelQuery>,
) -> Result<Response, AppError> {
    let outcome = services::build_funnel(state.funnel.as_ref(), &query.company_name).await?;
    let response = match outcome {
        FunnelOutcome::Report(report) => Json(FunnelData::from(&report)).into_response(),
        FunnelOutcome::NoData { company } => empty(no_data_message(&company)),
        FunnelOutcome::ZeroHeadcount { company } => empty(zero_headcount_message(&company)),
    };
    Ok(response)
}

fn empty(message: String) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(EmptyFunnel {
            success: false,
            message,
        }),
    )
        .into_response()
}
