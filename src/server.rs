use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, warn};
use serde::Deserialize;

use crate::app::{Session, Snapshot};
use crate::error::PlotError;

pub type AppState = Arc<Session>;

const PAGE: &str = include_str!("page.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Data,
    Clear,
    Count,
    ResetCount,
    ResetTimer,
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "data" => Ok(Action::Data),
            "clear" => Ok(Action::Clear),
            "count" => Ok(Action::Count),
            "reset_count" => Ok(Action::ResetCount),
            "reset_timer" => Ok(Action::ResetTimer),
            _ => Err(()),
        }
    }
}

impl Action {
    pub fn apply(self, session: &Session) -> Result<(), PlotError> {
        match self {
            Action::Data => session.on_data()?,
            Action::Clear => session.on_clear()?,
            Action::Count => session.on_count(),
            Action::ResetCount => session.on_count_reset(),
            Action::ResetTimer => session.on_timer_reset(),
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    /// Only there to give every publish a distinct address, so any value
    /// is accepted.
    pub update_index: Option<String>,
}

pub fn router(session: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/state", get(state_handler))
        .route("/action/{name}", post(action_handler))
        .route("/{id}/get_image_data", get(image_handler))
        .with_state(session)
}

pub async fn index_handler(State(session): State<AppState>) -> Html<String> {
    Html(PAGE.replace("{{IMAGE_SRC}}", &session.publisher().image_src()))
}

pub async fn state_handler(State(session): State<AppState>) -> Json<Snapshot> {
    Json(session.snapshot())
}

pub async fn image_handler(
    State(session): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<ImageQuery>,
) -> Response {
    let publisher = session.publisher();
    if id != publisher.id() {
        warn!("image requested for unknown object {id}");
        return StatusCode::NOT_FOUND.into_response();
    }
    let version = query
        .update_index
        .as_deref()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    match publisher.fetch(version) {
        Some(image) => (
            [(header::CONTENT_TYPE, image.content_type)],
            image.bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn action_handler(
    State(session): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Snapshot>, (StatusCode, String)> {
    let action = Action::from_str(&name)
        .map_err(|_| (StatusCode::NOT_FOUND, format!("unknown action '{name}'")))?;
    debug!("action {action:?}");

    // Redraws render a bitmap, keep them off the async workers.
    let worker = session.clone();
    tokio::task::spawn_blocking(move || action.apply(&worker))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            warn!("{action:?} failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(session.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions() {
        assert_eq!("data".parse(), Ok(Action::Data));
        assert_eq!("reset_timer".parse(), Ok(Action::ResetTimer));
        assert_eq!("Data".parse::<Action>(), Err(()));
    }

    #[test]
    fn page_has_image_placeholder() {
        assert!(PAGE.contains("{{IMAGE_SRC}}"));
    }
}
