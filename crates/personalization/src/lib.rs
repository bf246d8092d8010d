//! Recommendation enrichment: joins recommendation logs with customers,
//! products and segments, and explains each one with a rationale.

pub mod enrichment;
pub mod rationale;

pub use enrichment::{RecommendationEnricher, ReferenceResolver, HIGH_PRIORITY_CONFIDENCE};
pub use rationale::{RationaleRule, RationaleRules};
