//! Topic normalization for encyclopedia lookups.

/// Title-case every whitespace-separated word: first character upper case,
/// the rest lower case. Runs of whitespace collapse to a single space.
///
/// Classifier labels are usually lower case (`"bird of paradise"`) while page
/// titles are capitalized (`"Bird Of Paradise"` redirects to the real page).
pub fn normalize_topic(topic: &str) -> String {
    topic
        .split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_single_word() {
        assert_eq!(normalize_topic("daisy"), "Daisy");
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(normalize_topic("bird of paradise"), "Bird Of Paradise");
    }

    #[test]
    fn lowercases_the_tail() {
        assert_eq!(normalize_topic("SUNFLOWER"), "Sunflower");
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(normalize_topic("  giant   white arum lily "), "Giant White Arum Lily");
    }

    #[test]
    fn handles_non_ascii() {
        assert_eq!(normalize_topic("édelweiss"), "Édelweiss");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize_topic("   "), "");
    }
}
