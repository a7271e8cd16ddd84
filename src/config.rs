//! Loading an external corpus bank from TOML.
//!
//! Expected schema: repeated `[[texts]]` tables with `title` and `category`
//! required, `id`/`author`/`dynasty`/`description` optional, and nested
//! `[[texts.paragraphs]]` tables with `content` required and `id` optional.
//! Missing text ids are minted as UUIDs; missing paragraph ids as `p<n>`.

use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{Paragraph, SourceText};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CorpusConfig {
  #[serde(default)]
  pub texts: Vec<TextCfg>,
}

/// Corpus entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct TextCfg {
  #[serde(default)] pub id: Option<String>,
  pub title: String,
  #[serde(default)] pub author: Option<String>,
  #[serde(default)] pub dynasty: Option<String>,
  pub category: String,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub paragraphs: Vec<ParagraphCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParagraphCfg {
  #[serde(default)] pub id: Option<String>,
  pub content: String,
}

impl TextCfg {
  fn into_source_text(self) -> SourceText {
    let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let paragraphs = self
      .paragraphs
      .into_iter()
      .enumerate()
      .map(|(i, p)| Paragraph {
        id: p.id.unwrap_or_else(|| format!("p{}", i + 1)),
        content: p.content,
      })
      .collect();
    SourceText {
      id,
      title: self.title,
      author: self.author,
      dynasty: self.dynasty,
      category: self.category,
      description: self.description,
      paragraphs,
    }
  }
}

/// Attempt to load the corpus from CORPUS_PATH. On any IO/parsing error,
/// returns None and the caller falls back to the built-in seed corpus.
pub fn load_corpus_from_env() -> Option<Vec<SourceText>> {
  let path = std::env::var("CORPUS_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<CorpusConfig>(&s) {
      Ok(cfg) => {
        let mut texts = Vec::with_capacity(cfg.texts.len());
        for tc in cfg.texts {
          if tc.title.trim().is_empty() {
            error!(target: "beisong_backend", %path, "Skipping corpus entry: empty title.");
            continue;
          }
          texts.push(tc.into_source_text());
        }
        info!(target: "beisong_backend", %path, count = texts.len(), "Loaded corpus bank (TOML)");
        Some(texts)
      }
      Err(e) => {
        error!(target: "beisong_backend", %path, error = %e, "Failed to parse TOML corpus");
        None
      }
    },
    Err(e) => {
      error!(target: "beisong_backend", %path, error = %e, "Failed to read corpus file");
      None
    }
  }
}
