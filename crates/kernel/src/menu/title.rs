//! Human readable titles derived from item ids.

/// Convert an id to title case: `user_profile` -> `User Profile`.
///
/// Words are split on underscores, hyphens and whitespace; each word gets an
/// upper-case first letter and lower-case remainder.
pub fn title_case(id: &str) -> String {
    id.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
