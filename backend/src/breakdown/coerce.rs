//! Cell text coercion.
//!
//! Turns trimmed report cell text into integers, booleans and token lists.
//! Every failing coercion carries the offending text and a context string
//! (`"<side> <row label>"`) so the aggregate error points at the exact cell.

use crate::error::{CoerceError, CoerceResult};

/// Separator between multiple values packed into one cell (`2•1`).
pub const BULLET: &str = "•";

/// Separator between per-robot / per-team entries of one cell.
pub const LINE: &str = "\n";

const TRUE_VALUES: &[&str] = &["true", "yes", "y", "1", "x", "✔", "✓", "achieved"];
const FALSE_VALUES: &[&str] = &["false", "no", "n", "0", "", "✘", "✗"];

/// Parse a base-10 integer.
pub fn parse_int(text: &str, context: &str) -> CoerceResult<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|source| CoerceError::InvalidInteger {
            text: trimmed.to_string(),
            context: context.to_string(),
            source,
        })
}

/// Parse a yes/no marker (case-insensitive).
pub fn parse_bool(text: &str, context: &str) -> CoerceResult<bool> {
    let lower = text.trim().to_lowercase();
    if TRUE_VALUES.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSE_VALUES.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(CoerceError::InvalidBoolean {
            text: text.trim().to_string(),
            context: context.to_string(),
        })
    }
}

/// Split on `delimiter`, trim every token and drop empty leading and
/// trailing tokens. Empty tokens in between are kept.
///
/// Never fails; empty input yields an empty list.
pub fn split_and_strip(text: &str, delimiter: &str) -> Vec<String> {
    let tokens: Vec<&str> = text.split(delimiter).map(str::trim).collect();
    let Some(first) = tokens.iter().position(|t| !t.is_empty()) else {
        return Vec::new();
    };
    let last = tokens.iter().rposition(|t| !t.is_empty()).unwrap_or(first);
    tokens[first..=last].iter().map(|t| t.to_string()).collect()
}

/// Like [`split_and_strip`], but exactly `expected` tokens are required.
pub fn split_exact(text: &str, delimiter: &str, expected: usize, context: &str) -> CoerceResult<Vec<String>> {
    let tokens = split_and_strip(text, delimiter);
    if tokens.len() != expected {
        return Err(CoerceError::TokenCount {
            context: context.to_string(),
            expected,
            found: tokens.len(),
        });
    }
    Ok(tokens)
}

/// Split into exactly `expected` integers.
pub fn split_ints(text: &str, delimiter: &str, expected: usize, context: &str) -> CoerceResult<Vec<i64>> {
    split_exact(text, delimiter, expected, context)?
        .iter()
        .map(|token| parse_int(token, context))
        .collect()
}
