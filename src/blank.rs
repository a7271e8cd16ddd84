//! The text-blanking engine behind recitation practice.
//!
//! Three rules decide which Chinese characters of a passage get hidden:
//!   - interval: every Nth Chinese character counting from a start offset
//!   - random: a uniform subset sized as a percentage of the total
//!   - first-char: everything except the first character of each sentence
//!
//! Hidden characters are replaced with the `__ ` placeholder. Non-Chinese
//! characters always pass through unchanged and never advance the interval
//! count. Output is plain text; any markup is the caller's concern.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::BlankMode;
use crate::util::{is_chinese_char, is_sentence_end};

/// Placeholder emitted for one hidden character. Wider than the character it
/// replaces; the width difference is intentional and not normalized away.
pub const CHAR_BLANK: &str = "__ ";

/// Returned instead of output when the passage is empty after trimming.
pub const EMPTY_INPUT_MESSAGE: &str = "请输入文言文内容后再进行处理";

/// Blank `text` according to `mode`.
///
/// Out-of-range numeric parameters are clamped to their defaults first; the
/// mode actually applied is returned with the result so the caller can
/// reflect corrected values back to the user.
pub fn generate<R: Rng>(text: &str, mode: &BlankMode, rng: &mut R) -> (String, BlankMode) {
  let mode = mode.normalized();
  let text = text.trim();
  if text.is_empty() {
    return (EMPTY_INPUT_MESSAGE.to_string(), mode);
  }

  let result = match mode {
    BlankMode::FirstChar => first_char_only(text),
    BlankMode::Interval { interval, start } => {
      masked(text, Some((interval as usize, start as usize)), None, rng)
    }
    BlankMode::Random { random_ratio } => masked(text, None, Some(random_ratio as usize), rng),
    BlankMode::Combined { interval, start, random_ratio } => masked(
      text,
      Some((interval as usize, start as usize)),
      Some(random_ratio as usize),
      rng,
    ),
  };
  (result, mode)
}

/// Show only the first Chinese character of each sentence.
/// A sentence starts at the beginning of the text and after every
/// terminator, where the comma counts as a terminator too.
fn first_char_only(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut new_sentence = true;

  for ch in text.chars() {
    if is_chinese_char(ch) {
      if new_sentence {
        out.push(ch);
        new_sentence = false;
      } else {
        out.push_str(CHAR_BLANK);
      }
    } else {
      out.push(ch);
      if is_sentence_end(ch) {
        new_sentence = true;
      }
    }
  }
  out
}

/// Interval and/or random blanking over one passage.
///
/// `interval` is `(interval, start)` with the running Chinese-character
/// count 1-indexed: character number n is hidden iff `n >= start` and
/// `(n - start) % interval == 0`. `ratio` hides `floor(N * ratio / 100)`
/// positions drawn uniformly from the N Chinese-character positions.
fn masked<R: Rng>(
  text: &str,
  interval: Option<(usize, usize)>,
  ratio: Option<usize>,
  rng: &mut R,
) -> String {
  // Char positions of every Chinese character, collected up front so the
  // random subset is drawn before the rewrite pass.
  let chinese_positions: Vec<usize> = text
    .chars()
    .enumerate()
    .filter(|(_, ch)| is_chinese_char(*ch))
    .map(|(i, _)| i)
    .collect();

  let mut random_positions: HashSet<usize> = HashSet::new();
  if let Some(ratio) = ratio {
    if !chinese_positions.is_empty() {
      let count = chinese_positions.len() * ratio / 100;
      let mut shuffled = chinese_positions.clone();
      shuffled.shuffle(rng);
      random_positions.extend(shuffled.into_iter().take(count));
    }
  }

  let mut out = String::with_capacity(text.len());
  let mut chinese_seen = 0usize;

  for (i, ch) in text.chars().enumerate() {
    if !is_chinese_char(ch) {
      out.push(ch);
      continue;
    }
    chinese_seen += 1;

    let by_interval = interval
      .map_or(false, |(interval, start)| chinese_seen >= start && (chinese_seen - start) % interval == 0);
    // Checked second so a position hit by both rules is replaced once.
    let by_random = !by_interval && random_positions.contains(&i);

    if by_interval || by_random {
      out.push_str(CHAR_BLANK);
    } else {
      out.push(ch);
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
  }

  fn count_blanks(s: &str) -> usize {
    s.matches(CHAR_BLANK).count()
  }

  fn count_chinese(s: &str) -> usize {
    s.chars().filter(|c| is_chinese_char(*c)).count()
  }

  #[test]
  fn empty_input_yields_sentinel_message() {
    for text in ["", "   ", "\n\t"] {
      let (out, _) = generate(text, &BlankMode::default(), &mut rng());
      assert_eq!(out, EMPTY_INPUT_MESSAGE);
    }
  }

  #[test]
  fn interval_blanks_every_nth_from_start() {
    let mode = BlankMode::Interval { interval: 3, start: 1 };
    let (out, _) = generate("先帝创业未半而中道崩殂。", &mode, &mut rng());
    // Chinese chars 1,4,7,10 hidden; punctuation untouched.
    assert_eq!(out, "__ 帝创__ 未半__ 中道__ 殂。");
  }

  #[test]
  fn interval_only_generation_is_deterministic() {
    let mode = BlankMode::Interval { interval: 2, start: 2 };
    let text = "青，取之于蓝，而青于蓝。";
    let (a, _) = generate(text, &mode, &mut rng());
    let (b, _) = generate(text, &mode, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
  }

  #[test]
  fn non_chinese_chars_pass_through_and_do_not_count() {
    let mode = BlankMode::Interval { interval: 1, start: 1 };
    let (out, _) = generate("abc 123 先帝！", &mode, &mut rng());
    assert_eq!(out, "abc 123 __ __ ！");
  }

  #[test]
  fn length_class_invariant_holds() {
    let text = "水陆草木之花，可爱者甚蕃。晋陶渊明独爱菊。";
    let total = count_chinese(text);
    for mode in [
      BlankMode::Interval { interval: 3, start: 1 },
      BlankMode::Random { random_ratio: 50 },
      BlankMode::FirstChar,
    ] {
      let (out, _) = generate(text, &mode, &mut rng());
      assert_eq!(count_blanks(&out) + count_chinese(&out), total, "mode {:?}", mode);
    }
  }

  #[test]
  fn random_ratio_blank_count_is_exact() {
    // 20 Chinese characters, no punctuation interference on the count.
    let text = "君子曰学不可以已青取之于蓝而青于蓝冰水为";
    assert_eq!(count_chinese(text), 20);
    for ratio in [1, 25, 30, 50, 99, 100] {
      let (out, _) = generate(text, &BlankMode::Random { random_ratio: ratio }, &mut rng());
      assert_eq!(count_blanks(&out), 20 * ratio as usize / 100, "ratio {}", ratio);
    }
  }

  #[test]
  fn combined_mode_blanks_union_without_stacking() {
    let text = "故木受绳则直金就砺则利";
    let total = count_chinese(text);
    // Interval 1 hides everything already; ratio 100 marks everything too.
    let mode = BlankMode::Combined { interval: 1, start: 1, random_ratio: 100 };
    let (out, _) = generate(text, &mode, &mut rng());
    assert_eq!(count_blanks(&out), total);
    assert_eq!(count_chinese(&out), 0);
  }

  #[test]
  fn combined_mode_hides_at_least_each_rule_alone() {
    let text = "外无期功强近之亲，内无应门五尺之僮。";
    let interval_only = BlankMode::Interval { interval: 4, start: 1 };
    let combined = BlankMode::Combined { interval: 4, start: 1, random_ratio: 50 };
    let (a, _) = generate(text, &interval_only, &mut rng());
    let (b, _) = generate(text, &combined, &mut rng());
    assert!(count_blanks(&b) >= count_blanks(&a));
  }

  #[test]
  fn first_char_keeps_sentence_heads_only() {
    let (out, _) = generate("臣少多疾病，九岁不行。零丁孤苦！", &BlankMode::FirstChar, &mut rng());
    // Head of text, head after the comma, head after the period.
    assert_eq!(out, "臣__ __ __ __ ，九__ __ __ 。零__ __ __ ！");
  }

  #[test]
  fn first_char_treats_semicolon_and_question_as_terminators() {
    let (out, _) = generate("生孩六月；慈父见背？行年四岁", &BlankMode::FirstChar, &mut rng());
    assert_eq!(out, "生__ __ __ ；慈__ __ __ ？行__ __ __ ");
  }

  #[test]
  fn out_of_range_params_fall_back_to_defaults() {
    let mode = BlankMode::Combined { interval: 0, start: -3, random_ratio: 250 };
    let (_, applied) = generate("先帝创业", &mode, &mut rng());
    assert_eq!(applied, BlankMode::Combined { interval: 3, start: 1, random_ratio: 30 });

    let (_, applied) = generate("先帝创业", &BlankMode::Random { random_ratio: 0 }, &mut rng());
    assert_eq!(applied, BlankMode::Random { random_ratio: 30 });
  }

  #[test]
  fn start_zero_is_respected_after_normalization() {
    // start = 0 is in range and must not be bumped to the default.
    let mode = BlankMode::Interval { interval: 3, start: 0 };
    let (out, applied) = generate("先帝创业未半而", &mode, &mut rng());
    assert_eq!(applied, mode);
    // Counts 3 and 6 satisfy (n - 0) % 3 == 0.
    assert_eq!(out, "先帝__ 业未__ 而");
  }
}
