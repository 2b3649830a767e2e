use crate::vocabulary::Vocabulary;

const MAX_TARGETS: usize = 3;
const TRIM_CHARS: &[char] = &['?', '.', ',', '!', ' '];

/// Turns a free-text query into at most three candidate target keywords,
/// in the order they first appear.
///
/// Args:
///     query (&str): The raw user query, e.g. "where is the person?".
///     vocabulary (&Vocabulary): Supplies the stop-word set.
///
/// Returns:
///     Vec<String>: Lower-cased keywords. Empty when nothing usable remains.
pub fn extract_targets(query: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let mut targets: Vec<String> = Vec::with_capacity(MAX_TARGETS);

    for token in query.to_lowercase().split_whitespace() {
        let token = token.trim_matches(TRIM_CHARS);
        if token.chars().count() <= 2 || vocabulary.is_stop_word(token) {
            continue;
        }
        if targets.iter().any(|t| t == token) {
            continue;
        }

        targets.push(token.to_string());
        if targets.len() == MAX_TARGETS {
            break;
        }
    }

    targets
}

/// Case-insensitive containment in either direction, so "phone" matches
/// "cell phone" and "chairs" matches "chair".
pub fn matches_keyword(keyword: &str, label: &str) -> bool {
    let keyword = keyword.to_lowercase();
    let label = label.to_lowercase();
    if keyword.is_empty() || label.is_empty() {
        return false;
    }
    label.contains(&keyword) || keyword.contains(&label)
}
