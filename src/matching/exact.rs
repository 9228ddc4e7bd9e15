use crate::error::LinkError;
use crate::matching::index::VariantIndex;
use crate::matching::variants::generate_variants;
use crate::models::ExactMatch;
use crate::normalize::normalize_name;

/// Hash join of source names against the reference variant index.
///
/// Emits at most one pair per source record. When several variants hit the
/// index, the lexicographically smallest shared variant decides the
/// canonical name.
pub fn exact_match<S: AsRef<str>>(
    source: &[S],
    index: &VariantIndex,
) -> Result<Vec<ExactMatch>, LinkError> {
    let mut out = Vec::new();
    for raw in source {
        if let Some(m) = match_one(raw.as_ref(), index)? {
            out.push(m);
        }
    }
    Ok(out)
}

/// Exact match for a single source name.
pub fn match_one(raw: &str, index: &VariantIndex) -> Result<Option<ExactMatch>, LinkError> {
    let variants = generate_variants(raw)?;
    // VariantSet iterates in sorted order
    let hit = variants
        .iter()
        .find_map(|v| index.get(v).map(|canonical| (v, canonical)));
    Ok(hit.map(|(variant, canonical)| ExactMatch {
        source: normalize_name(raw),
        canonical: canonical.to_string(),
        shared_variant: variant.clone(),
    }))
}
