//! HTTP endpoint handlers. These are thin wrappers that forward to core
//! logic and the session stores; each is instrumented with its parameters.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::domain::{SourceText, UnknownCard};
use crate::logic::{build_review, process_passage, DEFAULT_REVIEW_COUNT};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.chars().count()))]
pub async fn http_post_process(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ProcessIn>,
) -> impl IntoResponse {
  let (blanked, mode) = process_passage(&state, &body.text, &body.mode).await;
  Json(ProcessOut { blanked, mode })
}

#[instrument(level = "info", skip(state), fields(semester = %q.semester.clone().unwrap_or_else(|| "all".into())))]
pub async fn http_get_texts(
  State(state): State<Arc<AppState>>,
  Query(q): Query<TextsQuery>,
) -> impl IntoResponse {
  let texts = state
    .list_texts(q.semester.as_deref())
    .into_iter()
    .map(to_summary)
    .collect::<Vec<_>>();
  info!(target: "beisong_backend", count = texts.len(), "HTTP texts listed");
  Json(TextsOut { semesters: state.semesters(), texts })
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_text(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SourceText>, StatusCode> {
  match state.get_text(&id) {
    Some(text) => Ok(Json(text.clone())),
    None => Err(StatusCode::NOT_FOUND),
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_review(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ReviewIn>,
) -> impl IntoResponse {
  let count = body.count.unwrap_or(DEFAULT_REVIEW_COUNT);
  let questions = build_review(&state, count).await;
  info!(target: "review", count = questions.len(), "HTTP review set served");
  Json(ReviewOut { questions })
}

#[instrument(level = "info", skip(state, body), fields(%body.text_id, selected = body.selected))]
pub async fn http_post_selection(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SelectIn>,
) -> Result<Json<SelectOut>, StatusCode> {
  if !state.set_selected(&body.text_id, body.selected).await {
    return Err(StatusCode::NOT_FOUND);
  }
  Ok(Json(SelectOut { text_id: body.text_id, selected: body.selected }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_cards(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(CardsOut { sources: state.cards_by_source().await })
}

#[instrument(level = "info", skip(state, card), fields(uid = %card.uid))]
pub async fn http_post_unknown(
  State(state): State<Arc<AppState>>,
  Json(card): Json<UnknownCard>,
) -> impl IntoResponse {
  let uid = card.uid.clone();
  let marked = state.toggle_unknown(card).await;
  info!(target: "beisong_backend", %uid, marked, "HTTP unknown card toggled");
  Json(UnknownOut { uid, marked })
}

#[instrument(level = "info", skip(state, body), fields(%body.uid))]
pub async fn http_post_familiar(
  State(state): State<Arc<AppState>>,
  Json(body): Json<FamiliarIn>,
) -> impl IntoResponse {
  let marked = state.mark_familiar(&body.uid).await;
  Json(FamiliarOut { uid: body.uid, marked })
}
