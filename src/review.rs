//! Review-question generation: sentence extraction and clause blanking.
//!
//! A quiz item hides one comma/semicolon-delimited clause of a sentence.
//! Sentences without an internal clause break are merged with a neighboring
//! sentence from the same paragraph and hidden whole. Sentences that can do
//! neither come back with `blank_index = -1` and are filtered by the caller.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::{QuizItem, Sentence, SourceText};
use crate::util::strip_terminal_punct;

/// Placeholder emitted for one hidden clause or merged-away sentence.
pub const CLAUSE_BLANK: &str = "__________";

/// Appended to a trailing segment that carries no terminal punctuation.
const DEFAULT_TERMINAL: char = '。';

/// Split every paragraph of `text` into sentences.
///
/// Content is split on `。！？` with the delimiter kept as a suffix of the
/// preceding segment; a trailing segment without one gets `。` appended.
/// Empty (trimmed) segments are dropped. Each sentence carries the
/// paragraph's full sentence list and its own index so clause blanking can
/// merge across sentence boundaries later.
pub fn extract_sentences(text: &SourceText) -> Vec<Sentence> {
  let mut sentences = Vec::new();

  for paragraph in &text.paragraphs {
    let mut paragraph_sentences: Vec<String> = Vec::new();
    let mut buf = String::new();

    for ch in paragraph.content.chars() {
      if matches!(ch, '。' | '！' | '？') {
        if !buf.trim().is_empty() {
          let mut sentence = buf.trim().to_string();
          sentence.push(ch);
          paragraph_sentences.push(sentence);
        }
        buf.clear();
      } else {
        buf.push(ch);
      }
    }
    if !buf.trim().is_empty() {
      let mut sentence = buf.trim().to_string();
      sentence.push(DEFAULT_TERMINAL);
      paragraph_sentences.push(sentence);
    }

    for (index, sentence) in paragraph_sentences.iter().enumerate() {
      sentences.push(Sentence {
        text: sentence.clone(),
        source: text.title.clone(),
        author: text.author.clone(),
        dynasty: text.dynasty.clone(),
        paragraph_sentences: paragraph_sentences.clone(),
        index_in_paragraph: index,
      });
    }
  }
  sentences
}

/// Stable key used for de-duplication and caller-side familiarity tracking:
/// source title plus the first 20 characters of the original text.
pub fn make_uid(source: &str, original: &str) -> String {
  let source = if source.is_empty() { "unknown" } else { source };
  let prefix: String = original.chars().take(20).collect();
  format!("{}_{}", source, prefix)
}

/// Split a sentence on the internal delimiters `，` and `；`, keeping the
/// delimiters in a parallel list so the sentence can be reassembled with
/// its original interleaving.
fn split_clauses(text: &str) -> (Vec<String>, Vec<char>) {
  let mut clauses = Vec::new();
  let mut separators = Vec::new();
  let mut buf = String::new();

  for ch in text.chars() {
    if matches!(ch, '，' | '；') {
      if !buf.trim().is_empty() {
        clauses.push(buf.trim().to_string());
      }
      separators.push(ch);
      buf.clear();
    } else {
      buf.push(ch);
    }
  }
  if !buf.trim().is_empty() {
    clauses.push(buf.trim().to_string());
  }
  (clauses, separators)
}

/// Turn one sentence into a quiz item by hiding a clause.
///
/// Multi-clause sentences hide one clause chosen uniformly from all but the
/// last (the last clause carries the terminal punctuation; hiding it would
/// erase the sentence boundary). Single-clause sentences merge with a
/// neighbor and hide themselves whole.
pub fn blank_sentence<R: Rng>(sentence: &Sentence, rng: &mut R) -> QuizItem {
  let (clauses, separators) = split_clauses(&sentence.text);

  if clauses.len() <= 1 {
    return merge_and_blank(sentence, rng);
  }

  let random_index = rng.gen_range(0..clauses.len() - 1);
  let selected = clauses[random_index].clone();

  let mut blanked = String::new();
  for (i, clause) in clauses.iter().enumerate() {
    if i == random_index {
      blanked.push_str(CLAUSE_BLANK);
    } else {
      blanked.push_str(clause);
    }
    if let Some(sep) = separators.get(i) {
      blanked.push(*sep);
    }
  }

  quiz_item(sentence, sentence.text.clone(), blanked, random_index as i32, selected)
}

/// Single-clause path: merge with the previous or next sentence of the same
/// paragraph and hide the current sentence inside the combined string.
fn merge_and_blank<R: Rng>(sentence: &Sentence, rng: &mut R) -> QuizItem {
  let siblings = &sentence.paragraph_sentences;
  let index = sentence.index_in_paragraph;

  if siblings.len() <= 1 {
    return unblankable(sentence);
  }

  let can_next = index + 1 < siblings.len();
  let can_prev = index > 0;
  let merge_with_next = match (can_next, can_prev) {
    (true, true) => rng.gen_bool(0.5),
    (true, false) => true,
    (false, true) => false,
    (false, false) => return unblankable(sentence),
  };

  let combined = if merge_with_next {
    format!("{}{}", sentence.text, siblings[index + 1])
  } else {
    format!("{}{}", siblings[index - 1], sentence.text)
  };

  let blank_text = strip_terminal_punct(&sentence.text).to_string();
  let blanked = combined.replacen(&blank_text, CLAUSE_BLANK, 1);

  quiz_item(sentence, combined, blanked, 0, blank_text)
}

/// Valid non-error outcome for a sentence nothing can be hidden in.
fn unblankable(sentence: &Sentence) -> QuizItem {
  quiz_item(sentence, sentence.text.clone(), sentence.text.clone(), -1, String::new())
}

fn quiz_item(
  sentence: &Sentence,
  original: String,
  blanked: String,
  blank_index: i32,
  blank_text: String,
) -> QuizItem {
  let uid = make_uid(&sentence.source, &original);
  QuizItem {
    original,
    blanked,
    blank_index,
    blank_text,
    source: sentence.source.clone(),
    author: sentence.author.clone(),
    dynasty: sentence.dynasty.clone(),
    uid,
  }
}

/// Assemble up to `count` quiz questions from the corpus.
///
/// Semester markers and contentless texts are skipped; when `selected` is
/// non-empty only those text ids are sampled. The result may be shorter
/// than `count` when the corpus cannot supply enough distinct blankable
/// sentences, and empty for an empty corpus — never an error.
pub fn build_review_set<R: Rng>(
  corpus: &[SourceText],
  count: usize,
  selected: &HashSet<String>,
  rng: &mut R,
) -> Vec<QuizItem> {
  let mut valid: Vec<&SourceText> = corpus.iter().filter(|t| t.is_selectable()).collect();
  if !selected.is_empty() {
    valid.retain(|t| selected.contains(&t.id));
  }
  valid.shuffle(rng);
  valid.truncate(count);

  let mut pool: Vec<Sentence> = valid.iter().flat_map(|t| extract_sentences(t)).collect();
  pool.shuffle(rng);

  let mut questions: Vec<QuizItem> = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();
  for sentence in &pool {
    if questions.len() >= count {
      break;
    }
    let item = blank_sentence(sentence, rng);
    if !item.is_valid() {
      continue;
    }
    if seen.insert(item.uid.clone()) {
      questions.push(item);
    }
  }

  debug!(
    target: "review",
    produced = questions.len(),
    requested = count,
    pool = pool.len(),
    "review set assembled"
  );
  questions
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Paragraph;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn text_with(paragraphs: &[&str]) -> SourceText {
    SourceText {
      id: "t1".into(),
      title: "陈情表".into(),
      author: Some("李密".into()),
      dynasty: Some("晋".into()),
      category: "必修下册".into(),
      description: None,
      paragraphs: paragraphs
        .iter()
        .enumerate()
        .map(|(i, content)| Paragraph { id: format!("p{}", i + 1), content: (*content).to_string() })
        .collect(),
    }
  }

  #[test]
  fn extraction_splits_on_terminal_punctuation_and_keeps_it() {
    let text = text_with(&["生孩六月，慈父见背。行年四岁！舅夺母志？"]);
    let sentences = extract_sentences(&text);
    let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["生孩六月，慈父见背。", "行年四岁！", "舅夺母志？"]);
    assert_eq!(sentences[1].index_in_paragraph, 1);
    assert_eq!(sentences[1].paragraph_sentences.len(), 3);
  }

  #[test]
  fn trailing_segment_without_punctuation_gets_a_period() {
    let text = text_with(&["晋陶渊明独爱菊。自李唐来"]);
    let sentences = extract_sentences(&text);
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[1].text, "自李唐来。");
  }

  #[test]
  fn extraction_reconstructs_paragraph_content() {
    let content = "外无期功强近之亲，内无应门五尺之僮，茕茕孑立，形影相吊。而刘夙婴疾病，常在床蓐。";
    let text = text_with(&[content]);
    let joined: String = extract_sentences(&text).iter().map(|s| s.text.as_str()).collect();
    assert_eq!(joined, content);
  }

  #[test]
  fn extraction_spans_multiple_paragraphs() {
    let text = text_with(&["臣密言。", "祖母刘愍臣孤弱，躬亲抚养。"]);
    let sentences = extract_sentences(&text);
    assert_eq!(sentences.len(), 2);
    // Sibling lists do not leak across paragraph boundaries.
    assert_eq!(sentences[0].paragraph_sentences.len(), 1);
    assert_eq!(sentences[1].paragraph_sentences.len(), 1);
  }

  #[test]
  fn multi_clause_never_blanks_the_final_clause() {
    let text = text_with(&["臣少多疾病，九岁不行，零丁孤苦，至于成立。"]);
    let sentence = &extract_sentences(&text)[0];
    for seed in 0..64 {
      let item = blank_sentence(sentence, &mut StdRng::seed_from_u64(seed));
      assert!((0..=2).contains(&item.blank_index), "index {}", item.blank_index);
      assert_ne!(item.blank_text, "至于成立。");
      assert!(item.blanked.contains(CLAUSE_BLANK));
      assert!(item.blanked.ends_with('。'));
    }
  }

  #[test]
  fn clause_blanking_round_trips() {
    let text = text_with(&["既无伯叔，终鲜兄弟；门衰祚薄，晚有儿息。"]);
    let sentence = &extract_sentences(&text)[0];
    for seed in 0..16 {
      let item = blank_sentence(sentence, &mut StdRng::seed_from_u64(seed));
      // Putting the hidden clause back yields the original sentence.
      assert_eq!(item.blanked.replacen(CLAUSE_BLANK, &item.blank_text, 1), item.original);
      assert_eq!(item.original, sentence.text);
    }
  }

  #[test]
  fn single_clause_sentence_merges_with_its_only_neighbor() {
    let text = text_with(&["晋陶渊明独爱菊。自李唐来，世人甚爱牡丹。"]);
    let sentence = &extract_sentences(&text)[0];
    let item = blank_sentence(sentence, &mut StdRng::seed_from_u64(1));
    assert_eq!(item.blank_index, 0);
    assert_eq!(item.blank_text, "晋陶渊明独爱菊");
    assert_eq!(item.original, "晋陶渊明独爱菊。自李唐来，世人甚爱牡丹。");
    assert_eq!(item.blanked, "__________。自李唐来，世人甚爱牡丹。");
  }

  #[test]
  fn single_clause_merge_round_trips_through_blank_text() {
    let text = text_with(&["水陆草木之花。晋陶渊明独爱菊。自李唐来。"]);
    for sentence in &extract_sentences(&text) {
      for seed in 0..16 {
        let item = blank_sentence(sentence, &mut StdRng::seed_from_u64(seed));
        assert!(item.is_valid());
        assert_eq!(item.blanked.replacen(CLAUSE_BLANK, &item.blank_text, 1), item.original);
      }
    }
  }

  #[test]
  fn lone_single_clause_sentence_is_unblankable() {
    let text = text_with(&["水陆草木之花。"]);
    let sentence = &extract_sentences(&text)[0];
    let item = blank_sentence(sentence, &mut StdRng::seed_from_u64(3));
    assert_eq!(item.blank_index, -1);
    assert!(!item.is_valid());
    assert_eq!(item.blanked, item.original);
  }

  #[test]
  fn uid_is_stable_and_prefix_limited() {
    let uid = make_uid("陈情表", "外无期功强近之亲，内无应门五尺之僮，茕茕孑立。");
    assert_eq!(uid, "陈情表_外无期功强近之亲，内无应门五尺之僮，茕茕");
    assert_eq!(uid, make_uid("陈情表", "外无期功强近之亲，内无应门五尺之僮，茕茕孑立。"));
    assert_eq!(make_uid("", "短句。"), "unknown_短句。");
  }

  #[test]
  fn review_set_skips_semester_markers_and_duplicates() {
    let mut marker = text_with(&["必修上册"]);
    marker.id = "sem".into();
    marker.title = "必修上册".into();
    marker.category = crate::domain::SEMESTER_CATEGORY.into();
    let corpus = vec![
      marker,
      text_with(&["臣少多疾病，九岁不行，零丁孤苦，至于成立。既无伯叔，终鲜兄弟，门衰祚薄，晚有儿息。"]),
    ];

    let questions = build_review_set(&corpus, 5, &HashSet::new(), &mut StdRng::seed_from_u64(9));
    assert!(!questions.is_empty());
    let mut uids = HashSet::new();
    for q in &questions {
      assert!(q.is_valid());
      assert_eq!(q.source, "陈情表");
      assert!(uids.insert(q.uid.clone()), "duplicate uid {}", q.uid);
    }
  }

  #[test]
  fn review_set_respects_selection_filter() {
    let mut other = text_with(&["先帝创业未半而中道崩殂，今天下三分，益州疲弊。"]);
    other.id = "t2".into();
    other.title = "出师表".into();
    let corpus = vec![text_with(&["臣少多疾病，九岁不行，零丁孤苦，至于成立。"]), other];

    let selected: HashSet<String> = ["t2".to_string()].into_iter().collect();
    let questions = build_review_set(&corpus, 5, &selected, &mut StdRng::seed_from_u64(11));
    assert!(!questions.is_empty());
    assert!(questions.iter().all(|q| q.source == "出师表"));
  }

  #[test]
  fn review_set_is_deterministic_under_a_fixed_seed() {
    let corpus = vec![text_with(&[
      "臣密言：臣以险衅，夙遭闵凶。生孩六月，慈父见背；行年四岁，舅夺母志。祖母刘愍臣孤弱，躬亲抚养。",
    ])];
    let a = build_review_set(&corpus, 3, &HashSet::new(), &mut StdRng::seed_from_u64(5));
    let b = build_review_set(&corpus, 3, &HashSet::new(), &mut StdRng::seed_from_u64(5));
    let uids_a: Vec<&str> = a.iter().map(|q| q.uid.as_str()).collect();
    let uids_b: Vec<&str> = b.iter().map(|q| q.uid.as_str()).collect();
    assert_eq!(uids_a, uids_b);
    assert!(a.len() <= 3);
  }

  #[test]
  fn empty_corpus_yields_empty_result() {
    let questions = build_review_set(&[], 5, &HashSet::new(), &mut StdRng::seed_from_u64(1));
    assert!(questions.is_empty());
  }
}
