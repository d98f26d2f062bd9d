//! String utility functions for user-facing messages.
//!
//! Provides the similarity search behind "did you mean" suggestions and the
//! list formatting shared by several messages.

/// Maximum edit distance for a name to count as a suggestion
const SUGGESTION_DISTANCE: usize = 3;

/// Levenshtein edit distance between two strings, counted in chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Names from `corpus` within the suggestion distance of `word`, closest first
///
/// Ties keep corpus order so output is deterministic.
pub fn similar_names<'a>(word: &str, corpus: &'a [String]) -> Vec<&'a str> {
    let mut scored: Vec<(usize, &str)> = corpus
        .iter()
        .map(|candidate| (levenshtein(word, candidate), candidate.as_str()))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .collect();
    scored.sort_by_key(|(distance, _)| *distance);
    scored.into_iter().map(|(_, name)| name).collect()
}

/// Join quoted items as `'a'`, `'a' or 'b'`, `'a', 'b' or 'c'`
pub fn quoted_list(items: &[&str], conjunction: &str) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} {conjunction} {last}", rest.join(", ")),
    }
}

/// Message for a gem that is missing from the lockfile, with suggestions
pub fn gem_not_found_message(name: &str, candidates: &[String]) -> String {
    let mut message = format!("Could not find gem '{name}'.");
    let suggestions = similar_names(name, candidates);
    if !suggestions.is_empty() {
        message.push_str(&format!(" Did you mean {}?", quoted_list(&suggestions, "or")));
    }
    message
}

/// Split a gem full name into name and version: `rspec-core-3.13.0` -> (`rspec-core`, `3.13.0`)
///
/// The version starts at the first `-` followed by a digit. A trailing
/// platform (`nokogiri-1.16.0-x86_64-linux`) is dropped.
pub fn split_full_name(full_name: &str) -> Option<(&str, &str)> {
    let split = full_name
        .match_indices('-')
        .map(|(i, _)| i)
        .find(|&i| full_name[i + 1..].starts_with(|c: char| c.is_ascii_digit()))?;

    let name = &full_name[..split];
    let rest = &full_name[split + 1..];
    let version = rest.split_once('-').map_or(rest, |(version, _platform)| version);
    (!name.is_empty()).then_some((name, version))
}
