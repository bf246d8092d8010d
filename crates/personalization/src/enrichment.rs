//! Recommendation enrichment engine.

use custlysis_core::reports::{EnrichedRecommendation, Priority};
use custlysis_core::types::{
    CustomerSummary, ProductSummary, RecommendationRecord, SegmentAssignment,
};
use custlysis_segmentation::SegmentLookup;
use tracing::debug;

use crate::rationale::RationaleRules;

/// Display value for a customer or product that cannot be resolved.
pub const UNKNOWN: &str = "Unknown";

/// Confidence strictly above this is high priority.
pub const HIGH_PRIORITY_CONFIDENCE: f64 = 85.0;

/// Dereferences the weak customer/product references on a recommendation.
/// `None` means the referenced record no longer exists.
pub trait ReferenceResolver {
    fn customer(&self, customer_id: i64) -> Option<CustomerSummary>;
    fn product(&self, product_id: i64) -> Option<ProductSummary>;
}

pub struct RecommendationEnricher {
    rules: RationaleRules,
}

impl RecommendationEnricher {
    pub fn new(rules: RationaleRules) -> Self {
        Self { rules }
    }

    /// Enriches every recommendation, preserving input order. Missing
    /// references degrade to display defaults and never fail the batch.
    pub fn enrich(
        &self,
        recommendations: &[RecommendationRecord],
        assignments: &[SegmentAssignment],
        resolver: &dyn ReferenceResolver,
    ) -> Vec<EnrichedRecommendation> {
        let lookup = SegmentLookup::build(assignments);
        let enriched: Vec<EnrichedRecommendation> = recommendations
            .iter()
            .map(|rec| self.enrich_one(rec, &lookup, resolver))
            .collect();
        debug!(count = enriched.len(), "Enriched recommendations");
        enriched
    }

    pub fn enrich_one(
        &self,
        rec: &RecommendationRecord,
        lookup: &SegmentLookup<'_>,
        resolver: &dyn ReferenceResolver,
    ) -> EnrichedRecommendation {
        let customer = rec.customer_id.and_then(|id| resolver.customer(id));
        let product = rec.product_id.and_then(|id| resolver.product(id));

        let segment = customer
            .as_ref()
            .map(|c| lookup.segment_name(c.customer_id).to_string());

        let (product_id, product_name, product_category) = match product {
            Some(p) => (Some(p.product_id), p.name, p.category),
            None => (None, Some(UNKNOWN.to_string()), Some(UNKNOWN.to_string())),
        };
        let (customer_id, customer_name) = match customer {
            Some(c) => (Some(c.customer_id), c.name),
            None => (None, Some(UNKNOWN.to_string())),
        };

        let rationale = self
            .rules
            .explain(segment.as_deref(), product_category.as_deref())
            .to_string();

        EnrichedRecommendation {
            customer_id,
            customer_name,
            segment,
            product_id,
            product_name,
            product_category,
            confidence: rec.score,
            rationale,
            priority: classify_priority(rec.score),
        }
    }
}

impl Default for RecommendationEnricher {
    fn default() -> Self {
        Self::new(RationaleRules::standard())
    }
}

pub fn classify_priority(confidence: Option<f64>) -> Priority {
    match confidence {
        Some(c) if c > HIGH_PRIORITY_CONFIDENCE => Priority::High,
        _ => Priority::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rationale::PROFILE_RATIONALE;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Fixture {
        customers: HashMap<i64, CustomerSummary>,
        products: HashMap<i64, ProductSummary>,
    }

    impl Fixture {
        fn with_customer(mut self, id: i64, name: &str) -> Self {
            self.customers.insert(
                id,
                CustomerSummary {
                    customer_id: id,
                    name: Some(name.to_string()),
                },
            );
            self
        }

        fn with_product(mut self, id: i64, name: &str, category: Option<&str>) -> Self {
            self.products.insert(
                id,
                ProductSummary {
                    product_id: id,
                    name: Some(name.to_string()),
                    category: category.map(str::to_string),
                },
            );
            self
        }
    }

    impl ReferenceResolver for Fixture {
        fn customer(&self, customer_id: i64) -> Option<CustomerSummary> {
            self.customers.get(&customer_id).cloned()
        }

        fn product(&self, product_id: i64) -> Option<ProductSummary> {
            self.products.get(&product_id).cloned()
        }
    }

    fn rec(customer_id: Option<i64>, product_id: Option<i64>, score: Option<f64>) -> RecommendationRecord {
        RecommendationRecord {
            customer_id,
            product_id,
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_enrichment() {
        let refs = Fixture::default()
            .with_customer(1, "Asha")
            .with_product(10, "e-Saver", Some("Online Savings"));
        let assignments = vec![SegmentAssignment::new(1, "S1", "Digital Natives", Some(88.0))];

        let out = RecommendationEnricher::default().enrich(
            &[rec(Some(1), Some(10), Some(92.5))],
            &assignments,
            &refs,
        );

        assert_eq!(out.len(), 1);
        let e = &out[0];
        assert_eq!(e.customer_id, Some(1));
        assert_eq!(e.customer_name.as_deref(), Some("Asha"));
        assert_eq!(e.segment.as_deref(), Some("Digital Natives"));
        assert_eq!(e.product_id, Some(10));
        assert_eq!(e.product_name.as_deref(), Some("e-Saver"));
        assert_eq!(e.product_category.as_deref(), Some("Online Savings"));
        assert_eq!(e.confidence, Some(92.5));
        assert_eq!(e.rationale, "High digital engagement, suitable for online savings products");
        assert_eq!(e.priority, Priority::High);
    }

    #[test]
    fn test_missing_references_degrade_to_unknown() {
        let out = RecommendationEnricher::default().enrich(
            &[rec(None, None, None)],
            &[],
            &Fixture::default(),
        );
        let e = &out[0];
        assert_eq!(e.customer_id, None);
        assert_eq!(e.customer_name.as_deref(), Some(UNKNOWN));
        assert_eq!(e.segment, None);
        assert_eq!(e.product_id, None);
        assert_eq!(e.product_name.as_deref(), Some(UNKNOWN));
        assert_eq!(e.product_category.as_deref(), Some(UNKNOWN));
        assert_eq!(e.rationale, PROFILE_RATIONALE);
        assert_eq!(e.priority, Priority::Medium);
    }

    #[test]
    fn test_dangling_references_are_treated_as_absent() {
        let out = RecommendationEnricher::default().enrich(
            &[rec(Some(99), Some(77), Some(50.0))],
            &[SegmentAssignment::new(99, "S1", "At-Risk", None)],
            &Fixture::default(),
        );
        let e = &out[0];
        assert_eq!(e.customer_id, None);
        assert_eq!(e.customer_name.as_deref(), Some(UNKNOWN));
        assert_eq!(e.segment, None);
        assert_eq!(e.rationale, PROFILE_RATIONALE);
    }

    #[test]
    fn test_customer_without_assignment_is_unassigned() {
        let refs = Fixture::default()
            .with_customer(2, "Ravi")
            .with_product(10, "Gold Fund", Some("Investment"));
        let out = RecommendationEnricher::default().enrich(&[rec(Some(2), Some(10), None)], &[], &refs);
        assert_eq!(out[0].segment.as_deref(), Some("Unassigned"));
        assert_eq!(
            out[0].rationale,
            "Recommended based on segment characteristics and product fit"
        );
    }

    #[test]
    fn test_missing_product_still_evaluates_segment_rules() {
        let refs = Fixture::default().with_customer(3, "Meera");
        let assignments = vec![SegmentAssignment::new(3, "S4", "At-Risk Customers", None)];
        let out = RecommendationEnricher::default().enrich(&[rec(Some(3), Some(5), None)], &assignments, &refs);
        assert_eq!(out[0].product_category.as_deref(), Some(UNKNOWN));
        assert_eq!(out[0].rationale, "High churn risk, needs retention offer");
    }

    #[test]
    fn test_product_without_category_uses_profile_rationale() {
        let refs = Fixture::default()
            .with_customer(3, "Meera")
            .with_product(5, "Mystery", None);
        let assignments = vec![SegmentAssignment::new(3, "S4", "At-Risk Customers", None)];
        let out = RecommendationEnricher::default().enrich(&[rec(Some(3), Some(5), None)], &assignments, &refs);
        assert_eq!(out[0].product_category, None);
        assert_eq!(out[0].rationale, PROFILE_RATIONALE);
    }

    #[test]
    fn test_segment_is_first_assignment_found() {
        let refs = Fixture::default()
            .with_customer(4, "Kiran")
            .with_product(1, "Fixed Deposit", Some("Savings"));
        let assignments = vec![
            SegmentAssignment::new(4, "S2", "Traditional Savers", None),
            SegmentAssignment::new(4, "S1", "Digital Natives", None),
        ];
        let out = RecommendationEnricher::default().enrich(&[rec(Some(4), Some(1), None)], &assignments, &refs);
        assert_eq!(out[0].segment.as_deref(), Some("Traditional Savers"));
        assert_eq!(out[0].rationale, "Conservative investor, prefers stable savings products");
    }

    #[test]
    fn test_order_is_preserved() {
        let refs = Fixture::default().with_customer(1, "A").with_customer(2, "B");
        let out = RecommendationEnricher::default().enrich(
            &[rec(Some(2), None, None), rec(None, None, None), rec(Some(1), None, None)],
            &[],
            &refs,
        );
        let ids: Vec<Option<i64>> = out.iter().map(|e| e.customer_id).collect();
        assert_eq!(ids, vec![Some(2), None, Some(1)]);
    }

    #[test]
    fn test_priority_boundary() {
        assert_eq!(classify_priority(Some(85.0)), Priority::Medium);
        assert_eq!(classify_priority(Some(85.0001)), Priority::High);
        assert_eq!(classify_priority(Some(100.0)), Priority::High);
        assert_eq!(classify_priority(Some(0.0)), Priority::Medium);
        assert_eq!(classify_priority(None), Priority::Medium);
    }
}
