use crate::state::AppState;
use axum::Router;

pub mod chart;
pub mod dto;
pub mod handlers;
pub mod report;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::funnel_routes()
}
