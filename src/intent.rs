//! Phrase-based detection of response-style requests embedded in a question.
//!
//! "tldr: World War 2" asks for a summary of "World War 2"; "what is DNA? eli5"
//! asks for a simplified explanation of "what is DNA?". Detection is pure and
//! deterministic: simplify phrases are tried before summarize phrases and the
//! first pattern in declaration order wins.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::models::Mode;

const SIMPLIFY_PATTERNS: &[&str] = &[
    r"\bexplain(?:\s+(?:it|this))?\s+like\s+i(?:'|’)?m\s+(?:\d+(?:\s+years?\s+old)?|an?\s+[a-z]+)\b",
    r"\bexplain\s+(?:it|this)\s+simply\b",
    r"\bexplain\s+simply\b",
    r"\bsimple\s+explanation\b",
    r"\beli\d+\b",
];

const SUMMARIZE_PATTERNS: &[&str] = &[
    r"\bsummarize\s+this\b",
    r"\bgive\s+me\s+a\s+(?:short\s+)?summary\b",
    r"\btl;?dr\b",
    r"\bbrief\s+summary\b",
    r"\bquick\s+summary\b",
    r"\bsum\s+it\s+up\b",
];

struct IntentPattern {
    mode: Mode,
    detect: Regex,
    /// Same phrase plus surrounding whitespace and one trailing ':' or ','.
    strip: Regex,
}

static PATTERNS: LazyLock<Vec<IntentPattern>> = LazyLock::new(|| {
    let simplify = SIMPLIFY_PATTERNS.iter().map(|p| (Mode::Simplify, *p));
    let summarize = SUMMARIZE_PATTERNS.iter().map(|p| (Mode::Summarize, *p));

    simplify
        .chain(summarize)
        .filter_map(|(mode, pattern)| {
            let detect = case_insensitive(pattern)?;
            let strip = case_insensitive(&format!(r"\s*(?:{pattern})\s*[:,]?\s*"))?;
            Some(IntentPattern {
                mode,
                detect,
                strip,
            })
        })
        .collect()
});

fn case_insensitive(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!("Invalid intent pattern {}: {}", pattern, e);
            None
        }
    }
}

/// Map raw question text to the response mode it asks for, if any.
pub fn detect_intent(text: &str) -> Option<Mode> {
    if text.trim().is_empty() {
        return None;
    }

    PATTERNS
        .iter()
        .find(|p| p.detect.is_match(text))
        .map(|p| p.mode)
}

/// Strip intent phrases from `text` once a mode has been detected.
///
/// With no mode the input is returned untouched. Otherwise the phrases of
/// every mode are removed, in declaration order, until none remains. The
/// cleaned text then detects nothing, so cleaning it again changes nothing.
pub fn clean_question_text(text: &str, mode: Option<Mode>) -> String {
    if mode.is_none() {
        return text.to_string();
    }

    let mut cleaned = text.to_string();
    loop {
        let mut changed = false;
        for pattern in PATTERNS.iter() {
            if pattern.strip.is_match(&cleaned) {
                cleaned = pattern.strip.replace_all(&cleaned, " ").into_owned();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    cleaned.trim().to_string()
}
