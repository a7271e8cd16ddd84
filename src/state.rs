//! Application state: the corpus plus the session-only stores.
//!
//! This module owns:
//!   - the corpus (from CORPUS_PATH TOML or the built-in seeds)
//!   - the review-selection set (which texts to sample questions from)
//!   - the unknown-card book and the familiar set
//!
//! The stores model the caller-owned key-value state the core algorithms
//! must never touch: everything here is in-memory and dies with the process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::load_corpus_from_env;
use crate::domain::{SourceText, UnknownCard, SEMESTER_CATEGORY};
use crate::seeds::seed_corpus;

/// Per-source view over the unknown-card book, used by the card endpoints.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SourceCards {
    pub source: String,
    pub unknown: Vec<UnknownCard>,
    pub familiar: usize,
    pub total: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Vec<SourceText>,
    pub selected_for_review: Arc<RwLock<HashSet<String>>>,
    pub unknown_cards: Arc<RwLock<HashMap<String, UnknownCard>>>,
    pub familiar_cards: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    /// Build state from env: load the corpus bank, falling back to seeds.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let corpus = load_corpus_from_env().unwrap_or_else(|| {
            info!(target: "beisong_backend", "CORPUS_PATH not set or unusable; using built-in seed corpus.");
            seed_corpus()
        });

        let markers = corpus.iter().filter(|t| t.category == SEMESTER_CATEGORY).count();
        let selectable = corpus.iter().filter(|t| t.is_selectable()).count();
        info!(
            target: "beisong_backend",
            texts = corpus.len(),
            selectable,
            semester_markers = markers,
            "Startup corpus inventory"
        );

        Self {
            corpus,
            selected_for_review: Arc::new(RwLock::new(HashSet::new())),
            unknown_cards: Arc::new(RwLock::new(HashMap::new())),
            familiar_cards: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Semester labels, in corpus order: titles of the `学期` marker entries.
    pub fn semesters(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.corpus
            .iter()
            .filter(|t| t.category == SEMESTER_CATEGORY)
            .filter(|t| seen.insert(t.title.clone()))
            .map(|t| t.title.clone())
            .collect()
    }

    /// Selectable texts, optionally narrowed to one semester by category
    /// prefix (the sidebar's semester filter).
    pub fn list_texts(&self, semester: Option<&str>) -> Vec<&SourceText> {
        self.corpus
            .iter()
            .filter(|t| t.category != SEMESTER_CATEGORY)
            .filter(|t| match semester {
                Some(s) if s != "all" => t.category.starts_with(s),
                _ => true,
            })
            .collect()
    }

    pub fn get_text(&self, id: &str) -> Option<&SourceText> {
        self.corpus.iter().find(|t| t.id == id)
    }

    /// Toggle a text in or out of the review-selection set.
    /// Returns false (and changes nothing) for an unknown or marker id.
    #[instrument(level = "debug", skip(self))]
    pub async fn set_selected(&self, id: &str, selected: bool) -> bool {
        let known = self.get_text(id).map(|t| t.is_selectable()).unwrap_or(false);
        if !known {
            return false;
        }
        let mut set = self.selected_for_review.write().await;
        if selected {
            set.insert(id.to_string());
        } else {
            set.remove(id);
        }
        true
    }

    pub async fn selected_snapshot(&self) -> HashSet<String> {
        self.selected_for_review.read().await.clone()
    }

    /// Toggle the unknown mark for a card. Marking removes the uid from the
    /// familiar set (unknown wins). Returns whether the card is now marked.
    #[instrument(level = "debug", skip(self, card), fields(uid = %card.uid))]
    pub async fn toggle_unknown(&self, card: UnknownCard) -> bool {
        let mut unknown = self.unknown_cards.write().await;
        if unknown.remove(&card.uid).is_some() {
            false
        } else {
            self.familiar_cards.write().await.remove(&card.uid);
            unknown.insert(card.uid.clone(), card);
            true
        }
    }

    /// Mark a uid familiar. Refused while the uid sits in the unknown book.
    /// Returns whether the uid is now familiar.
    #[instrument(level = "debug", skip(self), fields(%uid))]
    pub async fn mark_familiar(&self, uid: &str) -> bool {
        if self.unknown_cards.read().await.contains_key(uid) {
            return false;
        }
        self.familiar_cards.write().await.insert(uid.to_string());
        true
    }

    /// Unknown-card book grouped by source title, with familiar counts
    /// folded in (familiar uids resolve their source from the uid prefix).
    pub async fn cards_by_source(&self) -> Vec<SourceCards> {
        let unknown = self.unknown_cards.read().await;
        let familiar = self.familiar_cards.read().await;

        let mut grouped: HashMap<String, SourceCards> = HashMap::new();
        for card in unknown.values() {
            let source = if card.source.is_empty() { "未知来源".to_string() } else { card.source.clone() };
            let entry = grouped.entry(source.clone()).or_insert_with(|| SourceCards {
                source,
                unknown: Vec::new(),
                familiar: 0,
                total: 0,
            });
            entry.unknown.push(card.clone());
            entry.total += 1;
        }
        for uid in familiar.iter() {
            let source = uid.split('_').next().unwrap_or("未知来源").to_string();
            let entry = grouped.entry(source.clone()).or_insert_with(|| SourceCards {
                source,
                unknown: Vec::new(),
                familiar: 0,
                total: 0,
            });
            entry.familiar += 1;
            entry.total += 1;
        }

        let mut out: Vec<SourceCards> = grouped.into_values().collect();
        out.sort_by(|a, b| a.source.cmp(&b.source));
        out
    }
}
