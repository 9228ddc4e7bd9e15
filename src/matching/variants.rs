//! Lexical name variants used by the exact variant join.
//!
//! Two differently formatted records for the same person ("Smith, John",
//! "J. Smith", "Mr. John Smith") should share at least one variant.

use std::collections::BTreeSet;

use crate::error::LinkError;
use crate::normalize::normalize_name;

/// Courtesy and academic-degree markers, in removal order.
///
/// Detection and removal are raw substring operations on the normalized
/// text, so a token embedded in a longer word (e.g. "mba" inside
/// "gambardella") also counts.
pub const PREFIXES: [&str; 8] = ["mr.", "ms.", "mrs.", "phd.", "bc.", "ing.", "mrg.", "mba"];

/// Variant set of one name. Ordered, so iteration and tie-breaks are stable.
pub type VariantSet = BTreeSet<String>;

/// Generate the variant set for `name`.
///
/// The normalized input is always a member. Fails with
/// [`LinkError::InvalidInput`] when nothing is left after normalization.
pub fn generate_variants(name: &str) -> Result<VariantSet, LinkError> {
    let cleaned = normalize_name(name);
    if cleaned.is_empty() {
        return Err(LinkError::empty_name());
    }

    let mut out = VariantSet::new();
    push(&mut out, &cleaned);

    let prefixed = has_prefix(&cleaned);
    if !prefixed {
        push(&mut out, &first_initial(&cleaned));
    }

    let reversed = reverse_words(&cleaned);
    push(&mut out, &reversed);
    if prefixed {
        push(&mut out, &last_initial(&reversed));
    } else {
        push(&mut out, &first_initial(&reversed));
    }

    let stripped = strip_prefixes(&cleaned);
    push(&mut out, &stripped);
    if !stripped.contains('.') {
        push(&mut out, &first_initial(&stripped));
    }

    let stripped_reversed = reverse_words(&stripped);
    push(&mut out, &stripped_reversed);
    push(&mut out, &first_initial(&stripped_reversed));

    Ok(out)
}

/// True when any prefix token occurs anywhere in `text` (case-insensitive).
pub fn has_prefix(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PREFIXES.iter().any(|p| lowered.contains(p))
}

/// Remove every occurrence of every prefix token, then re-normalize.
pub fn strip_prefixes(normalized: &str) -> String {
    let mut s = normalized.to_string();
    for p in PREFIXES {
        s = s.replace(p, " ");
    }
    normalize_name(&s)
}

/// "john smith" -> "j. smith". Names with fewer than two words are
/// returned unchanged.
pub fn first_initial(text: &str) -> String {
    let Some((first, rest)) = text.split_once(' ') else {
        return text.to_string();
    };
    match first.chars().next() {
        Some(c) => format!("{}. {}", c, rest),
        None => text.to_string(),
    }
}

/// "smith john" -> "smith j.". Names with fewer than two words are
/// returned unchanged.
pub fn last_initial(text: &str) -> String {
    let Some((head, last)) = text.rsplit_once(' ') else {
        return text.to_string();
    };
    match last.chars().next() {
        Some(c) => format!("{} {}.", head, c),
        None => text.to_string(),
    }
}

pub fn reverse_words(text: &str) -> String {
    text.split(' ').rev().collect::<Vec<_>>().join(" ")
}

fn push(out: &mut VariantSet, candidate: &str) {
    let n = normalize_name(candidate);
    // An empty form would collide with every other prefix-only name.
    if !n.is_empty() {
        out.insert(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "John   Smith",
        "Mr. John Smith",
        "Smith, John",
        "Ing. Jan Novak, PhD.",
        "Mrs.  Anna-Maria  de la Cruz",
        "madonna",
        "MBA",
        "Gambardella Rosa",
        "bc.",
        "Łukasz Żółw",
        "j. smith",
    ];

    fn variants(name: &str) -> VariantSet {
        generate_variants(name).unwrap()
    }

    #[test]
    fn contains_normalized_original() {
        for s in SAMPLES {
            assert!(variants(s).contains(&normalize_name(s)), "input {:?}", s);
        }
    }

    #[test]
    fn every_variant_is_normalized() {
        for s in SAMPLES {
            for v in variants(s) {
                assert_eq!(normalize_name(&v), v, "variant {:?} of {:?}", v, s);
                assert!(!v.is_empty());
                assert!(!v.contains(','));
            }
        }
    }

    #[test]
    fn deterministic() {
        for s in SAMPLES {
            assert_eq!(variants(s), variants(s));
        }
    }

    #[test]
    fn plain_name_variants() {
        let v = variants("John   Smith");
        let expected: VariantSet = ["john smith", "j. smith", "smith john", "s. john"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(v, expected);
        assert!(v.contains(&normalize_name("smith john")));
    }

    #[test]
    fn prefixed_name_variants() {
        let v = variants("Mr. John Smith");
        assert!(v.contains("mr. john smith"));
        // reversed with the prefix trailing, last word abbreviated
        assert!(v.contains("smith john m."));
        assert!(v.contains("john smith"));
        assert!(v.contains("j. smith"));
        assert!(v.contains("smith john"));
        assert!(v.contains("s. john"));
        // no first-initial form of the prefixed original
        assert!(!v.contains("m. john smith"));
    }

    #[test]
    fn abbreviated_input_skips_initial_after_strip() {
        let v = variants("J. Smith");
        assert!(v.contains("j. smith"));
        assert!(v.contains("smith j."));
        assert!(!v.contains("j. j. smith"));
    }

    #[test]
    fn single_token_is_left_alone() {
        let v = variants("Madonna");
        assert_eq!(v.len(), 1);
        assert!(v.contains("madonna"));
        assert_eq!(first_initial("madonna"), "madonna");
        assert_eq!(last_initial("madonna"), "madonna");
    }

    #[test]
    fn prefix_only_name_drops_empty_forms() {
        let v = variants("MBA");
        assert_eq!(v.len(), 1);
        assert!(v.contains("mba"));
    }

    #[test]
    fn embedded_prefix_is_detected() {
        assert!(has_prefix("gambardella rosa"));
        assert_eq!(strip_prefixes("gambardella rosa"), "ga rdella rosa");
        let v = variants("Gambardella Rosa");
        assert!(v.contains("rosa gambardella"));
        assert!(v.contains("rosa g."));
        assert!(!v.contains("g. rosa"));
    }

    #[test]
    fn empty_name_is_rejected() {
        for s in ["", "   ", ",,", " , "] {
            assert!(matches!(
                generate_variants(s),
                Err(LinkError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn helpers() {
        assert_eq!(first_initial("john smith"), "j. smith");
        assert_eq!(first_initial("łukasz żółw"), "ł. żółw");
        assert_eq!(last_initial("smith john"), "smith j.");
        assert_eq!(reverse_words("a b c"), "c b a");
    }
}
