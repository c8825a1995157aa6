use std::sync::LazyLock;

use evalexpr::Value;
use regex::{Captures, Regex};
use thiserror::Error;

/// Substrings that reject an expression before it reaches the parser
pub(crate) const UNSAFE_TOKENS: [&str; 7] = ["__", "exec", "eval", "import", "open", "os", "sys"];

/// Longest expression handed to the parser
const MAX_EXPRESSION_LEN: usize = 1024;

/// Deepest parenthesis nesting handed to the parser
const MAX_NESTING: usize = 64;

static NUMBER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number literal regex"));

#[derive(Debug, Error, PartialEq)]
pub(crate) enum MathError {
    #[error("Error: unsafe operation detected in expression.")]
    Unsafe,

    #[error("Error: {0}")]
    Invalid(String),

    #[error("Error: the result is undefined (division by zero or overflow).")]
    Undefined,
}

/// Evaluate an arithmetic expression without executing anything else.
///
/// Integer literals are widened to floats first so `7 / 2` is `3.5` rather
/// than integer division. `**` is accepted as an alias for `^`, and chained
/// powers group to the right (`2 ^ 3 ^ 2` is `2 ^ 9`).
pub(crate) fn evaluate(expression: &str) -> Result<String, MathError> {
    let lower = expression.to_lowercase();
    if UNSAFE_TOKENS.iter().any(|token| lower.contains(token)) {
        return Err(MathError::Unsafe);
    }

    check_size(expression)?;

    let normalized = group_powers(&normalize(expression));
    let value = evalexpr::eval(&normalized).map_err(|e| MathError::Invalid(e.to_string()))?;

    match value {
        Value::Float(f) if !f.is_finite() => Err(MathError::Undefined),
        Value::Float(f) => Ok(format_float(f)),
        Value::Int(i) => Ok(i.to_string()),
        other => Err(MathError::Invalid(format!(
            "expression did not produce a number ({other})"
        ))),
    }
}

/// The parser recurses per nesting level, so oversized input is refused up front.
fn check_size(expression: &str) -> Result<(), MathError> {
    if expression.len() > MAX_EXPRESSION_LEN {
        return Err(MathError::Invalid(format!(
            "expression is longer than {MAX_EXPRESSION_LEN} characters"
        )));
    }

    let mut depth = 0usize;
    let mut deepest = 0usize;
    for c in expression.chars() {
        match c {
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if deepest > MAX_NESTING {
        return Err(MathError::Invalid(format!(
            "expression nests parentheses deeper than {MAX_NESTING} levels"
        )));
    }
    Ok(())
}

fn normalize(expression: &str) -> String {
    let powered = expression.replace("**", "^");
    NUMBER_LITERAL
        .replace_all(&powered, |caps: &Captures| {
            let literal = &caps[0];
            if literal.contains('.') {
                literal.to_string()
            } else {
                format!("{literal}.0")
            }
        })
        .into_owned()
}

/// One element of a parenthesis level: an operand (number, word or a
/// rendered group) or a run of operator characters.
enum Atom {
    Operand(String),
    Op(String),
}

/// Rewrite `a ^ b ^ c` as `a ^ (b ^ c)` at every nesting level. Input that
/// does not tokenize cleanly is returned unchanged for the parser to reject.
fn group_powers(expression: &str) -> String {
    let chars: Vec<char> = expression.chars().collect();
    let mut pos = 0;
    match parse_level(&chars, &mut pos) {
        Some(atoms) if pos == chars.len() => render_level(&atoms),
        _ => expression.to_string(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':')
}

/// Collect atoms until the closing `)` of this level (left unconsumed) or
/// the end of input.
fn parse_level(chars: &[char], pos: &mut usize) -> Option<Vec<Atom>> {
    let mut atoms = Vec::new();
    while let Some(&c) = chars.get(*pos) {
        if c.is_whitespace() {
            *pos += 1;
        } else if c == '(' {
            *pos += 1;
            let inner = parse_level(chars, pos)?;
            if chars.get(*pos) != Some(&')') {
                return None;
            }
            *pos += 1;
            atoms.push(Atom::Operand(format!("({})", render_level(&inner))));
        } else if c == ')' {
            break;
        } else if is_word_char(c) {
            let start = *pos;
            while chars.get(*pos).is_some_and(|&c| is_word_char(c)) {
                *pos += 1;
            }
            atoms.push(Atom::Operand(chars[start..*pos].iter().collect()));
        } else if c == '^' {
            *pos += 1;
            atoms.push(Atom::Op("^".to_string()));
        } else {
            let start = *pos;
            while chars.get(*pos).is_some_and(|&c| {
                !c.is_whitespace() && !is_word_char(c) && !matches!(c, '(' | ')' | '^')
            }) {
                *pos += 1;
            }
            atoms.push(Atom::Op(chars[start..*pos].iter().collect()));
        }
    }
    Some(atoms)
}

fn render_level(atoms: &[Atom]) -> String {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < atoms.len() {
        match &atoms[i] {
            Atom::Operand(base) => {
                let mut chain = vec![base.as_str()];
                while let (Some(Atom::Op(op)), Some(Atom::Operand(exponent))) =
                    (atoms.get(i + 1), atoms.get(i + 2))
                    && op == "^"
                {
                    chain.push(exponent);
                    i += 2;
                }
                parts.push(nest_powers(&chain));
            }
            Atom::Op(op) => parts.push(op.clone()),
        }
        i += 1;
    }
    parts.join(" ")
}

fn nest_powers(chain: &[&str]) -> String {
    match chain {
        [] => String::new(),
        [single] => single.to_string(),
        [base, exponent] => format!("{base} ^ {exponent}"),
        [base, rest @ ..] => format!("{base} ^ ({})", nest_powers(rest)),
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_operator_precedence() {
        assert_eq!(evaluate("5 + 10 * 2").unwrap(), "25");
    }

    #[test]
    fn division_is_not_truncated() {
        assert_eq!(evaluate("7 / 2").unwrap(), "3.5");
    }

    #[test]
    fn modulo_and_power() {
        assert_eq!(evaluate("10 % 3").unwrap(), "1");
        assert_eq!(evaluate("2 ^ 10").unwrap(), "1024");
        assert_eq!(evaluate("2 ** 3").unwrap(), "8");
    }

    #[test]
    fn chained_powers_group_to_the_right() {
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), "512");
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), "512");
        assert_eq!(evaluate("(2 ^ 3) ^ 2").unwrap(), "64");
        assert_eq!(evaluate("1 + 2 ^ 1 ^ 3 * 2").unwrap(), "5");
    }

    #[test]
    fn group_powers_nests_each_level() {
        assert_eq!(group_powers("2.0 ^ 3.0 ^ 2.0"), "2.0 ^ (3.0 ^ 2.0)");
        assert_eq!(
            group_powers("(1.0 ^ 2.0 ^ 3.0 ^ 4.0) * 5.0"),
            "(1.0 ^ (2.0 ^ (3.0 ^ 4.0))) * 5.0"
        );
        assert_eq!(group_powers("5.0 + 2.0"), "5.0 + 2.0");
        assert_eq!(group_powers("(1.0 + 2.0"), "(1.0 + 2.0");
    }

    #[test]
    fn leading_minus_is_kept() {
        assert_eq!(evaluate("-5 + 2").unwrap(), "-3");
        assert_eq!(group_powers("2.0 ^-1.0"), "2.0 ^ - 1.0");
        assert_eq!(evaluate("2 ^ -1").unwrap(), "0.5");
    }

    #[test]
    fn parentheses_and_decimals() {
        assert_eq!(evaluate("(5 + 3) * 2").unwrap(), "16");
        assert_eq!(evaluate("1.5 * 3").unwrap(), "4.5");
    }

    #[test]
    fn rejects_unsafe_tokens() {
        assert_eq!(evaluate("import os"), Err(MathError::Unsafe));
        assert_eq!(evaluate("__class__"), Err(MathError::Unsafe));
        assert_eq!(evaluate("EVAL(1)"), Err(MathError::Unsafe));
        assert_eq!(
            MathError::Unsafe.to_string(),
            "Error: unsafe operation detected in expression."
        );
    }

    #[test]
    fn malformed_expression_is_an_error() {
        let err = evaluate("5 +").unwrap_err();
        assert!(matches!(err, MathError::Invalid(_)));
        assert!(err.to_string().starts_with("Error: "));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(evaluate("1 / 0").is_err());
    }

    #[test]
    fn deeply_nested_expression_is_refused() {
        let depth = 20_000;
        let expression = format!("{}1 + 1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(evaluate(&expression), Err(MathError::Invalid(_))));
    }

    #[test]
    fn nesting_limit_is_checked_below_length_limit() {
        let expression = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        let err = evaluate(&expression).unwrap_err();
        assert!(err.to_string().contains("deeper than 64"));

        let fine = format!("{}1 + 1{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(evaluate(&fine).unwrap(), "2");
    }

    #[test]
    fn normalize_widens_integers_only() {
        assert_eq!(normalize("5 + 2.5 ** 2"), "5.0 + 2.5 ^ 2.0");
    }
}
