//! Token lists and extractors for the ordered rule chain
//!
//! Token lists are scanned in definition order; callers pass the trimmed,
//! lowercased message unless noted otherwise.

use regex::Regex;
use std::sync::LazyLock;

pub(crate) const GREETING_TOKENS: [&str; 4] = ["hello", "hi", "hey", "greetings"];
pub(crate) const FAREWELL_TOKENS: [&str; 4] = ["bye", "goodbye", "exit", "quit"];
pub(crate) const GRATITUDE_TOKENS: [&str; 3] = ["thank", "thanks", "appreciate"];
pub(crate) const HELP_PREFIX: &str = "help";
pub(crate) const GOOD_PREFIX: &str = "good";
pub(crate) const DAY_PERIODS: [&str; 4] = ["morning", "afternoon", "evening", "night"];
pub(crate) const QUESTION_PREFIXES: [&str; 4] = ["what is", "what are", "define", "explain"];
pub(crate) const FOLLOW_UP_MARKER: &str = "follow-up";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```python[ \t]*\r?\n(.*?)```").expect("valid code fence regex")
});

// [-]number (op number)+ with optional parentheses around operands
static ARITHMETIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\(\s*)*-?\d+(?:\.\d+)?(?:\s*(?:\*\*|[-+*/%^])\s*(?:\(\s*)*\d+(?:\.\d+)?(?:\s*\))*)+",
    )
    .expect("valid arithmetic regex")
});

pub(crate) fn starts_with_any(lower: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| lower.starts_with(token))
}

pub(crate) fn contains_any(lower: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| lower.contains(token))
}

/// First time-of-day word found anywhere in the message
pub(crate) fn day_period(lower: &str) -> Option<&'static str> {
    DAY_PERIODS.iter().copied().find(|period| lower.contains(period))
}

/// Inner text of the first ```python fenced block (case-sensitive marker)
pub(crate) fn extract_code_block(message: &str) -> Option<&str> {
    CODE_FENCE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First arithmetic expression embedded in the message
pub(crate) fn extract_arithmetic(message: &str) -> Option<&str> {
    ARITHMETIC.find(message).map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_any_checks_prefix_only() {
        assert!(starts_with_any("hey you", &GREETING_TOKENS));
        assert!(!starts_with_any("oh hello", &GREETING_TOKENS));
    }

    #[test]
    fn contains_any_scans_whole_message() {
        assert!(contains_any("i really appreciate it", &GRATITUDE_TOKENS));
        assert!(!contains_any("no gratitude here", &GRATITUDE_TOKENS));
    }

    #[test]
    fn day_period_uses_definition_order() {
        assert_eq!(day_period("good evening and good morning"), Some("morning"));
        assert_eq!(day_period("good night"), Some("night"));
        assert_eq!(day_period("good stuff"), None);
    }

    #[test]
    fn extract_code_block_returns_inner_text() {
        let message = "Check this:\n```python\nimport os\nprint(1)\n```\nthanks";
        assert_eq!(extract_code_block(message), Some("import os\nprint(1)\n"));
    }

    #[test]
    fn extract_code_block_requires_language_tag() {
        assert_eq!(extract_code_block("```\nprint(1)\n```"), None);
        assert_eq!(extract_code_block("```rust\nfn main() {}\n```"), None);
    }

    #[test]
    fn extract_arithmetic_from_sentence() {
        assert_eq!(
            extract_arithmetic("Calculate 5 + 10 * 2"),
            Some("5 + 10 * 2")
        );
        assert_eq!(
            extract_arithmetic("what's (2 + 3) * 4?"),
            Some("(2 + 3) * 4")
        );
        assert_eq!(extract_arithmetic("2 ** 8 please"), Some("2 ** 8"));
        assert_eq!(extract_arithmetic("1.5^2"), Some("1.5^2"));
    }

    #[test]
    fn extract_arithmetic_keeps_leading_minus() {
        assert_eq!(extract_arithmetic("-5 + 2"), Some("-5 + 2"));
        assert_eq!(extract_arithmetic("what is (-5 + 2) * 3"), Some("(-5 + 2) * 3"));
        assert_eq!(extract_arithmetic("10 - 4"), Some("10 - 4"));
    }

    #[test]
    fn extract_arithmetic_needs_an_operator() {
        assert_eq!(extract_arithmetic("I have 3 cats"), None);
        assert_eq!(extract_arithmetic("no numbers"), None);
    }
}
