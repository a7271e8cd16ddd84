//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{BlankMode, QuizItem, SourceText, UnknownCard};
use crate::state::SourceCards;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Process {
        text: String,
        #[serde(default)]
        mode: BlankMode,
    },
    Review {
        #[serde(default)]
        count: Option<usize>,
    },
    ListTexts {
        #[serde(default)]
        semester: Option<String>,
    },
    SelectText {
        #[serde(rename = "textId")]
        text_id: String,
        selected: bool,
    },
    ToggleUnknown {
        card: UnknownCard,
    },
    MarkFamiliar {
        uid: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Processed {
        blanked: String,
        mode: BlankMode,
    },
    Review {
        questions: Vec<QuizItem>,
    },
    Texts {
        semesters: Vec<String>,
        texts: Vec<TextSummary>,
    },
    Selection {
        #[serde(rename = "textId")]
        text_id: String,
        selected: bool,
    },
    Unknown {
        uid: String,
        marked: bool,
    },
    Familiar {
        uid: String,
        marked: bool,
    },
    Error {
        message: String,
    },
}

/// Sidebar listing entry: a text without its paragraphs.
#[derive(Clone, Debug, Serialize)]
pub struct TextSummary {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub dynasty: Option<String>,
    pub category: String,
}

/// Convert a full `SourceText` to the listing DTO.
pub fn to_summary(t: &SourceText) -> TextSummary {
    TextSummary {
        id: t.id.clone(),
        title: t.title.clone(),
        author: t.author.clone(),
        dynasty: t.dynasty.clone(),
        category: t.category.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct ProcessIn {
    pub text: String,
    #[serde(default)]
    pub mode: BlankMode,
}
#[derive(Serialize)]
pub struct ProcessOut {
    pub blanked: String,
    /// The mode actually applied, after out-of-range values were clamped.
    pub mode: BlankMode,
}

#[derive(Debug, Deserialize)]
pub struct TextsQuery {
    pub semester: Option<String>,
}
#[derive(Serialize)]
pub struct TextsOut {
    pub semesters: Vec<String>,
    pub texts: Vec<TextSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewIn {
    #[serde(default)]
    pub count: Option<usize>,
}
#[derive(Serialize)]
pub struct ReviewOut {
    pub questions: Vec<QuizItem>,
}

#[derive(Debug, Deserialize)]
pub struct SelectIn {
    #[serde(rename = "textId")]
    pub text_id: String,
    pub selected: bool,
}
#[derive(Serialize)]
pub struct SelectOut {
    #[serde(rename = "textId")]
    pub text_id: String,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct CardsOut {
    pub sources: Vec<SourceCards>,
}

#[derive(Serialize)]
pub struct UnknownOut {
    pub uid: String,
    pub marked: bool,
}

#[derive(Debug, Deserialize)]
pub struct FamiliarIn {
    pub uid: String,
}
#[derive(Serialize)]
pub struct FamiliarOut {
    pub uid: String,
    pub marked: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
