use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    error::AppError,
    state::AppState,
    subscriptions::{
        dto::{SubscribeRequest, SubscribeResponse},
        services,
    },
};

pub fn subscribe_routes() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

#[instrument(skip(state, payload))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, AppError> {
    services::subscribe(state.subscribers.as_ref(), payload).await?;
    Ok(Json(SubscribeResponse::subscribed()))
}
