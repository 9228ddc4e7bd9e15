//! Name matching: variant generation, the variant index and both joins.

pub mod approximate;
pub mod exact;
pub mod index;
pub mod similarity;
pub mod variants;

pub use approximate::{
    ApproximateOptions, ApproximateStats, DEFAULT_THRESHOLD, approximate_match,
    approximate_match_with,
};
pub use exact::exact_match;
pub use index::{IndexPolicy, VariantIndex};
pub use similarity::{ScorerKind, SimilarityScorer, TokenSortJaroWinkler, TokenSortRatio};
pub use variants::{VariantSet, generate_variants};
