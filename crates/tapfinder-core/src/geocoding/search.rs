//! Heuristics for interpreting what a user typed into the search box

const ADDRESS_WORDS: &[&str] =
    &["street", "st", "ave", "avenue", "rd", "road", "blvd", "boulevard", "city", "state"];

const LABEL_MAX_CHARS: usize = 20;

/// Five ASCII digits, e.g. a US zip code
pub fn is_zip_code(term: &str) -> bool {
    let term = term.trim();
    term.len() == 5 && term.chars().all(|c| c.is_ascii_digit())
}

/// Whether a search term should be geocoded rather than used as a text filter.
///
/// Zip codes, address keywords, standalone two-letter words (state codes),
/// commas, and anything with two or more words all count as places.
pub fn looks_like_place(term: &str) -> bool {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return false;
    }
    if is_zip_code(trimmed) || trimmed.contains(',') {
        return true;
    }
    if trimmed.split(' ').filter(|w| !w.is_empty()).count() >= 2 {
        return true;
    }

    trimmed
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            let lower = word.to_ascii_lowercase();
            ADDRESS_WORDS.contains(&lower.as_str())
                || (word.len() == 2 && word.chars().all(|c| c.is_ascii_alphabetic()))
        })
}

/// Short display label for a searched reference location
pub fn reference_label(term: &str) -> String {
    let trimmed = term.trim();
    if is_zip_code(trimmed) || trimmed.chars().count() <= LABEL_MAX_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(LABEL_MAX_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_codes_are_places() {
        assert!(looks_like_place("15201"));
        assert!(looks_like_place(" 16063 "));
        assert!(!looks_like_place("1520"));
    }

    #[test]
    fn test_addresses_are_places() {
        assert!(looks_like_place("Butler St"));
        assert!(looks_like_place("Pittsburgh, PA"));
        assert!(looks_like_place("PA"));
        assert!(looks_like_place("main street"));
    }

    #[test]
    fn test_single_names_are_text_filters() {
        assert!(!looks_like_place("giant"));
        assert!(!looks_like_place("Alpha"));
        assert!(!looks_like_place("   "));
    }

    #[test]
    fn test_reference_label() {
        assert_eq!(reference_label("15201"), "15201");
        assert_eq!(reference_label(" Lawrenceville "), "Lawrenceville");
        assert_eq!(
            reference_label("5247 Butler Street, Pittsburgh, PA"),
            "5247 Butler Street, ..."
        );
    }
}
