//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Thin orchestration only: snapshot whatever session state an operation
//! needs, then hand off to the pure engines in `blank` and `review` with a
//! thread-local RNG. No RNG value survives across an await point.

use tracing::{info, instrument};

use crate::blank;
use crate::domain::{BlankMode, QuizItem};
use crate::review;
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Default number of review questions (and sampled texts) per round.
pub const DEFAULT_REVIEW_COUNT: usize = 5;

/// Blank a passage for recitation practice.
/// Returns the blanked text plus the normalized mode actually applied.
#[instrument(level = "info", skip(_state, text), fields(text_len = text.chars().count()))]
pub async fn process_passage(_state: &AppState, text: &str, mode: &BlankMode) -> (String, BlankMode) {
  let mut rng = rand::thread_rng();
  let (blanked, applied) = blank::generate(text, mode, &mut rng);
  info!(
    target: "blanker",
    mode = ?applied,
    preview = %trunc_for_log(&blanked, 40),
    "passage processed"
  );
  (blanked, applied)
}

/// Build a fresh set of review questions from the corpus, honoring the
/// session's text selection when one exists.
#[instrument(level = "info", skip(state))]
pub async fn build_review(state: &AppState, count: usize) -> Vec<QuizItem> {
  let selected = state.selected_snapshot().await;
  let mut rng = rand::thread_rng();
  let questions = review::build_review_set(&state.corpus, count, &selected, &mut rng);
  info!(
    target: "review",
    produced = questions.len(),
    requested = count,
    selected = selected.len(),
    "review questions generated"
  );
  questions
}
