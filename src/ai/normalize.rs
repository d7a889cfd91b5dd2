//! Generated Text Normalization
//!
//! Models tend to open with an acknowledgement ("Okay, ...", "Sure!") and to
//! wrap code in Markdown fences. Both are removed before rendering.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::generation::FILLER_TOKENS;

static FILLER_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let alternatives = FILLER_TOKENS.join("|");
    Regex::new(&format!(r"(?i)^(?:{})\b[[:punct:]\s]*", alternatives)).ok()
});

static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\n(.*?)\n?```\s*$").ok());

/// Trim the text and drop a leading filler acknowledgement
///
/// A filler on its own line removes that whole line; a filler starting a
/// single-line answer removes only the filler word and the punctuation after
/// it. Returns `None` when nothing is left.
pub fn normalize_generated_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (first_line, rest) = match trimmed.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (trimmed, None),
    };

    let filler_end = FILLER_PREFIX
        .as_ref()
        .and_then(|re| re.find(first_line))
        .map(|m| m.end());

    let normalized = match (filler_end, rest) {
        (Some(_), Some(rest)) => rest.trim(),
        (Some(end), None) => first_line[end..].trim(),
        (None, _) => trimmed,
    };

    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Remove one enclosing Markdown code fence, if the whole text is fenced
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    CODE_FENCE
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim_end().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_filler_stripped() {
        assert_eq!(
            normalize_generated_text("Okay, here is the answer.").as_deref(),
            Some("here is the answer.")
        );
        assert_eq!(
            normalize_generated_text("sure! Lists files.").as_deref(),
            Some("Lists files.")
        );
    }

    #[test]
    fn test_multi_line_filler_line_dropped() {
        assert_eq!(
            normalize_generated_text("Okay!\nBody").as_deref(),
            Some("Body")
        );
        assert_eq!(
            normalize_generated_text("OK, here you go:\n\nLine one\nLine two").as_deref(),
            Some("Line one\nLine two")
        );
    }

    #[test]
    fn test_no_filler_only_trimmed() {
        assert_eq!(
            normalize_generated_text("  Lists files in Drive.\n").as_deref(),
            Some("Lists files in Drive.")
        );
    }

    #[test]
    fn test_filler_must_be_whole_word() {
        assert_eq!(
            normalize_generated_text("Okapi is an animal.").as_deref(),
            Some("Okapi is an animal.")
        );
        assert_eq!(
            normalize_generated_text("Surely this works.").as_deref(),
            Some("Surely this works.")
        );
    }

    #[test]
    fn test_empty_results_are_none() {
        assert!(normalize_generated_text("").is_none());
        assert!(normalize_generated_text("   \n ").is_none());
        assert!(normalize_generated_text("Okay.").is_none());
        assert!(normalize_generated_text("Sure!\n   ").is_none());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(
            strip_code_fence("```python\nprint('hi')\n```"),
            "print('hi')"
        );
        assert_eq!(strip_code_fence("```\na = 1\nb = 2\n```\n"), "a = 1\nb = 2");
        assert_eq!(strip_code_fence("x = 1"), "x = 1");
        assert_eq!(
            strip_code_fence("Intro\n```python\nx\n```"),
            "Intro\n```python\nx\n```"
        );
    }
}
