//! Text normalization for search queries and keyword lists.
//!
//! Company names and keyword phrases arrive as free-form text ("Amazon.com Inc.",
//! "AT&T", "e-commerce"). The search provider chokes on punctuation and very short
//! keywords match almost anything, so both are cleaned before use.

/// Minimum length of a token kept in a cleaned keyword phrase.
pub const MIN_TOKEN_LEN: usize = 3;

/// Remove every character that is not a letter, digit or whitespace and collapse
/// whitespace runs to a single space.
///
/// ```
/// assert_eq!(stock_gdelt::text::strip_symbols("Amazon.com,  Inc."), "Amazoncom Inc");
/// ```
pub fn strip_symbols(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean one keyword phrase.
///
/// `&` becomes `and`, periods are dropped, symbols are stripped and tokens shorter
/// than [`MIN_TOKEN_LEN`] characters are discarded. Returns `None` when nothing is left
/// (a phrase reduced to a bare `and` counts as nothing).
pub fn clean_keyword(phrase: &str) -> Option<String> {
    let expanded = phrase.replace('&', " and ").replace('.', "");
    let stripped = strip_symbols(&expanded);
    let tokens: Vec<&str> = stripped
        .split(' ')
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .collect();
    // "AT&T" must not turn into the keyword "and".
    if tokens.iter().all(|t| t.eq_ignore_ascii_case("and")) {
        None
    } else {
        Some(tokens.join(" "))
    }
}

/// Clean a keyword list, dropping phrases that clean to nothing and duplicates
/// (case-insensitive). Order of first appearance is preserved.
pub fn clean_keywords<I, S>(phrases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for phrase in phrases {
        let Some(cleaned) = clean_keyword(phrase.as_ref()) else {
            tracing::debug!(phrase = phrase.as_ref(), "keyword dropped after cleaning");
            continue;
        };
        if !out.iter().any(|k| k.eq_ignore_ascii_case(&cleaned)) {
            out.push(cleaned);
        }
    }
    out
}
