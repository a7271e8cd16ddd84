//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::{build_review, process_passage, DEFAULT_REVIEW_COUNT};
use crate::protocol::{to_summary, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "beisong_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "beisong_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "beisong_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "beisong_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "beisong_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Process { text, mode } => {
      let (blanked, mode) = process_passage(state, &text, &mode).await;
      ServerWsMessage::Processed { blanked, mode }
    }

    ClientWsMessage::Review { count } => {
      let count = count.unwrap_or(DEFAULT_REVIEW_COUNT);
      let questions = build_review(state, count).await;
      tracing::info!(target: "review", count = questions.len(), "WS review set served");
      ServerWsMessage::Review { questions }
    }

    ClientWsMessage::ListTexts { semester } => {
      let texts = state
        .list_texts(semester.as_deref())
        .into_iter()
        .map(to_summary)
        .collect();
      ServerWsMessage::Texts { semesters: state.semesters(), texts }
    }

    ClientWsMessage::SelectText { text_id, selected } => {
      if state.set_selected(&text_id, selected).await {
        ServerWsMessage::Selection { text_id, selected }
      } else {
        ServerWsMessage::Error { message: format!("Unknown textId: {}", text_id) }
      }
    }

    ClientWsMessage::ToggleUnknown { card } => {
      let uid = card.uid.clone();
      let marked = state.toggle_unknown(card).await;
      ServerWsMessage::Unknown { uid, marked }
    }

    ClientWsMessage::MarkFamiliar { uid } => {
      let marked = state.mark_familiar(&uid).await;
      ServerWsMessage::Familiar { uid, marked }
    }
  }
}
