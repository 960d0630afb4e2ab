//! The fixed syllable alphabet candidate roots are built from.
//!
//! The list is ordered; candidate roots are combinations of these entries
//! in this order, so reordering it would invalidate existing caches.

/// Romanized kana syllables, in gojuon order, restricted to the rows that
/// produce pleasant latin-alphabet domain roots.
pub const SYLLABLES: &[&str] = &[
    "ka", "ki", "ku", "ke", "ko", //
    "sa", "shi", "su", "se", "so", "sha", "shu", "sho", //
    "ta", "chi", "te", "to", "cha", "chu", "cho", //
    "na", "ni", "nu", "ne", "no", //
    "ha", "hi", "fu", "he", "ho", //
    "ma", "mi", "mu", "me", "mo", //
    "ya", "yu", "yo", //
    "ra", "ri", "ru", "re", "ro",
];

/// The built-in alphabet as owned strings, for `ScanConfig`.
pub fn default_syllables() -> Vec<String> {
    SYLLABLES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_size() {
        assert_eq!(SYLLABLES.len(), 43);
    }

    #[test]
    fn test_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for s in SYLLABLES {
            assert!(seen.insert(s), "duplicate syllable '{}'", s);
        }
    }

    #[test]
    fn test_all_lowercase_ascii() {
        for s in SYLLABLES {
            assert!(s.chars().all(|c| c.is_ascii_lowercase()));
            assert!(!s.is_empty() && s.len() <= 3);
        }
    }
}
