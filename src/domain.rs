//! Domain models: blanking modes, corpus texts, derived sentences, quiz items.

use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL: i64 = 3;
pub const DEFAULT_START: i64 = 1;
pub const DEFAULT_RANDOM_RATIO: i64 = 30;
pub const MIN_RANDOM_RATIO: i64 = 1;
pub const MAX_RANDOM_RATIO: i64 = 100;

/// `category` value marking a semester grouping label rather than a real text.
/// Such entries feed the semester filter list and are excluded everywhere else.
pub const SEMESTER_CATEGORY: &str = "学期";

/// How the blanking engine hides characters of a passage.
///
/// Exactly one variant is active at a time. `Combined` covers interval and
/// random blanking applied together (union of the two position sets);
/// `FirstChar` is exclusive of both numeric rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BlankMode {
  /// Keep the first Chinese character of each sentence, hide the rest.
  FirstChar,
  /// Hide every `interval`-th Chinese character counting from `start`.
  Interval {
    #[serde(default = "default_interval")]
    interval: i64,
    #[serde(default = "default_start")]
    start: i64,
  },
  /// Hide a random subset sized `random_ratio` percent of all Chinese chars.
  Random {
    #[serde(default = "default_random_ratio", rename = "randomRatio")]
    random_ratio: i64,
  },
  /// Interval and random rules at once. A character selected by both rules
  /// is replaced exactly once.
  Combined {
    #[serde(default = "default_interval")]
    interval: i64,
    #[serde(default = "default_start")]
    start: i64,
    #[serde(default = "default_random_ratio", rename = "randomRatio")]
    random_ratio: i64,
  },
}

fn default_interval() -> i64 { DEFAULT_INTERVAL }
fn default_start() -> i64 { DEFAULT_START }
fn default_random_ratio() -> i64 { DEFAULT_RANDOM_RATIO }

impl Default for BlankMode {
  fn default() -> Self {
    BlankMode::Interval { interval: DEFAULT_INTERVAL, start: DEFAULT_START }
  }
}

impl BlankMode {
  /// Clamp out-of-range parameters to their documented defaults.
  /// Invalid values are never a hard error; callers get the corrected mode
  /// back alongside the generated output.
  pub fn normalized(&self) -> BlankMode {
    fn norm_interval(v: i64) -> i64 {
      if v < 1 { DEFAULT_INTERVAL } else { v }
    }
    fn norm_start(v: i64) -> i64 {
      if v < 0 { DEFAULT_START } else { v }
    }
    fn norm_ratio(v: i64) -> i64 {
      if !(MIN_RANDOM_RATIO..=MAX_RANDOM_RATIO).contains(&v) { DEFAULT_RANDOM_RATIO } else { v }
    }

    match *self {
      BlankMode::FirstChar => BlankMode::FirstChar,
      BlankMode::Interval { interval, start } => BlankMode::Interval {
        interval: norm_interval(interval),
        start: norm_start(start),
      },
      BlankMode::Random { random_ratio } => BlankMode::Random {
        random_ratio: norm_ratio(random_ratio),
      },
      BlankMode::Combined { interval, start, random_ratio } => BlankMode::Combined {
        interval: norm_interval(interval),
        start: norm_start(start),
        random_ratio: norm_ratio(random_ratio),
      },
    }
  }
}

/// A contiguous block of source prose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paragraph {
  pub id: String,
  pub content: String,
}

/// A titled corpus text (or, when `category` is `学期`, a grouping label).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceText {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub author: Option<String>,
  #[serde(default)]
  pub dynasty: Option<String>,
  pub category: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub paragraphs: Vec<Paragraph>,
}

impl SourceText {
  /// A text the review builder may sample: not a semester marker and
  /// carrying at least one paragraph with non-empty content.
  pub fn is_selectable(&self) -> bool {
    self.category != SEMESTER_CATEGORY
      && self.paragraphs.iter().any(|p| !p.content.trim().is_empty())
  }
}

/// A sentence derived from a paragraph, never stored.
/// Keeps the paragraph's full sentence list so clause blanking can merge
/// with a neighbor when the sentence has no internal clause break.
#[derive(Clone, Debug)]
pub struct Sentence {
  pub text: String,
  pub source: String,
  pub author: Option<String>,
  pub dynasty: Option<String>,
  pub paragraph_sentences: Vec<String>,
  pub index_in_paragraph: usize,
}

/// One fill-in-the-blank review question.
/// `blank_index == -1` marks a sentence that could not be blanked; callers
/// filter these out rather than treating them as failures.
#[derive(Clone, Debug, Serialize)]
pub struct QuizItem {
  pub original: String,
  pub blanked: String,
  #[serde(rename = "blankIndex")]
  pub blank_index: i32,
  #[serde(rename = "blankText")]
  pub blank_text: String,
  pub source: String,
  pub author: Option<String>,
  pub dynasty: Option<String>,
  pub uid: String,
}

impl QuizItem {
  pub fn is_valid(&self) -> bool {
    self.blank_index >= 0
  }
}

/// Session-only record of a quiz item the user marked as unfamiliar
/// (the 生疏本). Lives in caller-owned stores, never in the core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnknownCard {
  pub uid: String,
  pub text: String,
  pub blanked: String,
  pub source: String,
  #[serde(default)]
  pub author: Option<String>,
  #[serde(default)]
  pub dynasty: Option<String>,
}
