//! The full set of repositories, shared by all request handlers.

use std::path::Path;
use std::sync::Arc;

use custlysis_core::types::{
    Account, CampaignResponse, Customer, CustomerSummary, Interaction, Product, ProductSummary,
    RecommendationRecord, SegmentAssignment, Transaction,
};
use custlysis_core::CustlysisResult;
use custlysis_personalization::ReferenceResolver;
use tracing::info;

use crate::repository::{Entity, Repository};
use crate::seed::SeedData;

/// Thread-safe in-memory store for every table of the banking schema.
pub struct DataStore {
    pub customers: Arc<Repository<Customer>>,
    pub products: Arc<Repository<Product>>,
    pub accounts: Arc<Repository<Account>>,
    pub transactions: Arc<Repository<Transaction>>,
    pub campaign_responses: Arc<Repository<CampaignResponse>>,
    pub interactions: Arc<Repository<Interaction>>,
    pub recommendations: Arc<Repository<RecommendationRecord>>,
    pub segment_assignments: Arc<Repository<SegmentAssignment>>,
}

impl DataStore {
    pub fn new() -> Self {
        info!("Data store initialized (in-memory)");
        Self {
            customers: Arc::default(),
            products: Arc::default(),
            accounts: Arc::default(),
            transactions: Arc::default(),
            campaign_responses: Arc::default(),
            interactions: Arc::default(),
            recommendations: Arc::default(),
            segment_assignments: Arc::default(),
        }
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> CustlysisResult<Self> {
        let store = Self::new();
        let seed = SeedData::from_file(path.as_ref())?;
        let loaded = store.load_seed(seed)?;
        info!(path = %path.as_ref().display(), records = loaded, "Seed data loaded");
        Ok(store)
    }

    /// Save every seed record, table by table. Returns the number saved.
    pub fn load_seed(&self, seed: SeedData) -> CustlysisResult<usize> {
        let total = seed.record_count();
        save_all(&self.customers, seed.customers)?;
        save_all(&self.products, seed.products)?;
        save_all(&self.accounts, seed.accounts)?;
        save_all(&self.transactions, seed.transactions)?;
        save_all(&self.campaign_responses, seed.campaign_responses)?;
        save_all(&self.interactions, seed.interactions)?;
        save_all(&self.recommendations, seed.recommendations)?;
        save_all(&self.segment_assignments, seed.segment_assignments)?;
        Ok(total)
    }

    pub fn recommendations_for_customer(&self, customer_id: i64) -> Vec<RecommendationRecord> {
        self.recommendations
            .find_all()
            .into_iter()
            .filter(|rec| rec.customer_id == Some(customer_id))
            .collect()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn save_all<E: Entity>(repo: &Repository<E>, records: Vec<E>) -> CustlysisResult<()> {
    for record in records {
        repo.save(record)?;
    }
    Ok(())
}

impl ReferenceResolver for DataStore {
    fn customer(&self, customer_id: i64) -> Option<CustomerSummary> {
        self.customers
            .find_by_id(&customer_id)
            .map(|c| c.summary(customer_id))
    }

    fn product(&self, product_id: i64) -> Option<ProductSummary> {
        self.products
            .find_by_id(&product_id)
            .map(|p| p.summary(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"{
        "customers": [{"customer_id": 1, "name": "Asha"}, {"name": "Ravi"}],
        "products": [{"product_id": 10, "name": "e-Saver", "category": "Savings"}],
        "recommendations": [
            {"customer_id": 1, "product_id": 10, "score": 91.0},
            {"customer_id": 2, "product_id": 10, "score": 60.0},
            {"customer_id": 1, "product_id": 11}
        ],
        "segment_assignments": [
            {"customer_id": 1, "segment_id": "S1", "segment_name": "Digital Natives", "score": 88.5}
        ]
    }"#;

    #[test]
    fn test_load_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let store = DataStore::from_seed_file(file.path()).unwrap();
        assert_eq!(store.customers.len(), 2);
        assert_eq!(store.customers.find_by_id(&2).unwrap().name.as_deref(), Some("Ravi"));
        assert_eq!(store.recommendations.len(), 3);
        assert_eq!(store.segment_assignments.len(), 1);
        assert!(store.accounts.is_empty());
    }

    #[test]
    fn test_invalid_seed_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let err = DataStore::from_seed_file(file.path()).err().unwrap();
        assert!(err.to_string().starts_with("Seed data error"));
    }

    #[test]
    fn test_seed_assignment_missing_required_field_fails() {
        let seed: Result<SeedData, _> =
            serde_json::from_str(r#"{"segment_assignments": [{"customer_id": 1}]}"#);
        assert!(seed.is_err());
    }

    #[test]
    fn test_recommendations_for_customer() {
        let store = DataStore::new();
        store.load_seed(serde_json::from_str(SEED).unwrap()).unwrap();
        let recs = store.recommendations_for_customer(1);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.customer_id == Some(1)));
        assert!(store.recommendations_for_customer(5).is_empty());
    }

    #[test]
    fn test_reference_resolution() {
        let store = DataStore::new();
        store.load_seed(serde_json::from_str(SEED).unwrap()).unwrap();

        let customer = store.customer(1).unwrap();
        assert_eq!(customer.name.as_deref(), Some("Asha"));
        let product = store.product(10).unwrap();
        assert_eq!(product.category.as_deref(), Some("Savings"));

        assert!(store.product(11).is_none());
        store.customers.delete_by_id(&1);
        assert!(store.customer(1).is_none());
    }
}
