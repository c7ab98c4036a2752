use anyhow::Context;
use tracing::info;

use crate::{
    error::AppError,
    funnel::{
        chart::{render_chart, render_placeholder},
        report::FunnelOutcome,
        repo::FunnelRepo,
    },
};

pub fn no_data_message(company: &str) -> String {
    format!("No data found for '{company}'")
}

pub fn zero_headcount_message(company: &str) -> String {
    format!("No headcount recorded for '{company}'")
}

pub async fn build_funnel(
    repo: &dyn FunnelRepo,
    company: &str,
) -> Result<FunnelOutcome, AppError> {
    if company.trim().is_empty() {
        info!("funnel: blank company name");
        return Ok(FunnelOutcome::NoData {
            company: company.to_owned(),
        });
    }

    let counts = repo
        .level_counts(company)
        .await
        .map_err(|e| AppError::from_persistence(e, "company_name"))?;
    let outcome = FunnelOutcome::from_counts(company, counts);

    match &outcome {
        FunnelOutcome::Report(r) => info!(company = %company, total = r.total, "funnel built"),
        FunnelOutcome::NoData { .. } => info!(company = %company, "funnel: unknown company"),
        FunnelOutcome::ZeroHeadcount { .. } => info!(company = %company, "funnel: zero headcount"),
    }
    Ok(outcome)
}

/// Chart markup, or a placeholder fragment for the empty cases.
pub fn render_funnel(outcome: &FunnelOutcome) -> Result<String, AppError> {
    match outcome {
        FunnelOutcome::Report(report) => {
            Ok(render_chart(report).context("serialize funnel chart")?)
        }
        FunnelOutcome::NoData { company } => Ok(render_placeholder(&no_data_message(company))),
        FunnelOutcome::ZeroHeadcount { company } => {
            Ok(render_placeholder(&zero_headcount_message(company)))
        }
    }
}
