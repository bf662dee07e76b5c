/// Credit for two labels that are equal ignoring case
const EXACT_MATCH: f64 = 1.0;

/// Credit for one label containing the other
const SUBSTRING_MATCH: f64 = 0.7;

/// Maximum credit for labels that only share words
const SHARED_WORD_MATCH: f64 = 0.4;

/// Words of this many characters or fewer never count as shared
const MIN_SIGNIFICANT_WORD_LEN: usize = 3;

/// Fuzzy overlap between two lists of free-text labels
///
/// Every label in `list_a` is compared with every label in `list_b`. A pair
/// earns 1.0 for a case-insensitive exact match, 0.7 when one contains the
/// other, or a fraction of 0.4 proportional to the significant words they
/// share. The summed credit is normalized by the longer list and capped at 1.0.
///
/// # Returns
/// A value in `[0, 1]`; 0 when either list is empty
pub fn calculate_overlap<A, B>(list_a: &[A], list_b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if list_a.is_empty() || list_b.is_empty() {
        return 0.0;
    }

    let lowered_b: Vec<String> = list_b.iter().map(|b| b.as_ref().to_lowercase()).collect();

    let mut match_score = 0.0;
    for a in list_a {
        let a = a.as_ref().to_lowercase();
        for b in &lowered_b {
            match_score += pair_similarity(&a, b);
        }
    }

    let max_possible = list_a.len().max(list_b.len()) as f64;
    (match_score / max_possible).min(1.0)
}

/// Similarity of two already-lowercased labels
#[inline]
fn pair_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return EXACT_MATCH;
    }

    if a.contains(b) || b.contains(a) {
        return SUBSTRING_MATCH;
    }

    let words_a = split_words(a);
    let words_b = split_words(b);

    let shared = words_a
        .iter()
        .filter(|w| {
            w.chars().count() > MIN_SIGNIFICANT_WORD_LEN
                && words_b.iter().any(|w2| w2.contains(*w) || w.contains(*w2))
        })
        .count();

    if shared == 0 {
        return 0.0;
    }

    let longest = words_a.len().max(words_b.len()) as f64;
    SHARED_WORD_MATCH * (shared as f64 / longest)
}

#[inline]
fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || c == '/' || c == '-'
}

/// Split a label on runs of whitespace, `/` and `-`
///
/// Runs of separators collapse into one split point. A label that starts or
/// ends with a separator keeps an empty edge token.
fn split_words(label: &str) -> Vec<&str> {
    let parts: Vec<&str> = label.split(is_word_separator).collect();
    let last = parts.len() - 1;

    parts
        .into_iter()
        .enumerate()
        .filter(|(i, part)| !part.is_empty() || *i == 0 || *i == last)
        .map(|(_, part)| part)
        .collect()
}
