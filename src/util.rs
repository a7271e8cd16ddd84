//! Small utility helpers used across modules.

/// True iff the char is a Chinese character in the blanking rules' sense:
/// the CJK Unified Ideographs range U+4E00–U+9FA5.
/// Narrower than full CJK on purpose; extension-block characters pass
/// through unblanked, like punctuation does.
pub fn is_chinese_char(ch: char) -> bool {
  ('\u{4E00}'..='\u{9FA5}').contains(&ch)
}

/// True iff the char ends a sentence for first-character blanking.
/// The comma counts as a terminator here: every comma-delimited run keeps
/// its leading character visible.
pub fn is_sentence_end(ch: char) -> bool {
  matches!(ch, '。' | '！' | '？' | '；' | '，')
}

/// Strip one trailing terminal punctuation mark (。！？), if present.
pub fn strip_terminal_punct(s: &str) -> &str {
  s.strip_suffix(|c| matches!(c, '。' | '！' | '？')).unwrap_or(s)
}

/// Log-safe truncation for large strings.
/// Char-based, not byte-based: payloads here are almost always Chinese text.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  let total = s.chars().count();
  if total <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} chars total)", head, total)
  }
}
