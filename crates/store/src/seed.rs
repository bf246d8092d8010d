//! Startup seed data: one JSON document holding any subset of the tables.

use std::path::Path;

use custlysis_core::types::{
    Account, CampaignResponse, Customer, Interaction, Product, RecommendationRecord,
    SegmentAssignment, Transaction,
};
use custlysis_core::{CustlysisError, CustlysisResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub campaign_responses: Vec<CampaignResponse>,
    pub interactions: Vec<Interaction>,
    pub recommendations: Vec<RecommendationRecord>,
    pub segment_assignments: Vec<SegmentAssignment>,
}

impl SeedData {
    pub fn from_file(path: impl AsRef<Path>) -> CustlysisResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CustlysisError::Seed(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| CustlysisError::Seed(format!("{}: {e}", path.display())))
    }

    pub fn record_count(&self) -> usize {
        self.customers.len()
            + self.products.len()
            + self.accounts.len()
            + self.transactions.len()
            + self.campaign_responses.len()
            + self.interactions.len()
            + self.recommendations.len()
            + self.segment_assignments.len()
    }
}
