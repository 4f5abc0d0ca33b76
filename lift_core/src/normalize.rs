//! Exercise-name normalization.
//!
//! Every catalog key is the output of [`normalize`], so lookups compare like
//! with like regardless of how the user typed the name.

/// Reduce a raw exercise name to its catalog lookup key.
///
/// Lower-cases, drops everything except alphanumerics, whitespace and `-`,
/// then collapses whitespace runs to a single space and trims. Idempotent.
pub fn normalize(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Treat hyphens as word breaks in an already-normalized key.
///
/// "pull-ups" and "pull ups" fold to the same string.
pub fn fold_separators(key: &str) -> String {
    key.split(|c: char| c == '-' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-snake-case token used as the canonical name of an unknown exercise.
///
/// "Dead hang" becomes "DEAD_HANG"; empty input stays empty.
pub fn to_canonical_token(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect::<String>()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}
