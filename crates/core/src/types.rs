//! Persisted banking records. Every non-key column is optional, mirroring the
//! nullable relational schema these records are loaded from.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub educational_level: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub income_bracket: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub geo_cluster: Option<String>,
    #[serde(default)]
    pub digital_score: Option<f64>,
    #[serde(default)]
    pub risk_profile: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub tenure_days: Option<i32>,
    #[serde(default)]
    pub churn_risk_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub eligibility_rules: Option<String>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub popularity_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub avg_monthly_txn: Option<f64>,
    #[serde(default)]
    pub overdraft_enabled: Option<bool>,
    #[serde(default)]
    pub last_active_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tenure_months: Option<i32>,
    #[serde(default)]
    pub channel_preferences: Option<String>,
    #[serde(default)]
    pub dormant_flag: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    #[serde(default)]
    pub txn_id: Option<i64>,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub txn_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub merchant_category: Option<String>,
    #[serde(default)]
    pub geo_location: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub is_high_value: Option<bool>,
    #[serde(default)]
    pub txn_score: Option<f64>,
}

/// A customer's reaction to a marketing campaign offering a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CampaignResponse {
    #[serde(default)]
    pub response_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub campaign_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub conversion_score: Option<f64>,
}

/// Usage of a held product by a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Interaction {
    #[serde(default)]
    pub interaction_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub usage_score: Option<f64>,
    #[serde(default)]
    pub satisfaction: Option<i32>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub cross_sell_flag: Option<bool>,
}

/// A model-produced product recommendation for one customer.
///
/// `customer_id` and `product_id` are weak references: the customer or
/// product may have been deleted since the recommendation was logged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRecord {
    #[serde(default)]
    pub rec_id: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    /// Model confidence on a 0–100 scale.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accepted: Option<bool>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Assignment of a customer to a segment by a scoring run.
/// Keyed by `(customer_id, segment_id)`; a customer may hold several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SegmentAssignment {
    pub customer_id: i64,
    pub segment_id: String,
    pub segment_name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub assigned_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub model_version: Option<String>,
}

impl SegmentAssignment {
    pub fn new(customer_id: i64, segment_id: &str, segment_name: &str, score: Option<f64>) -> Self {
        Self {
            customer_id,
            segment_id: segment_id.to_string(),
            segment_name: segment_name.to_string(),
            score,
            assigned_on: None,
            model_version: None,
        }
    }

    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            customer_id: self.customer_id,
            segment_id: self.segment_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentKey {
    pub customer_id: i64,
    pub segment_id: String,
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.customer_id, self.segment_id)
    }
}

/// Display fields of a customer, as resolved from a weak reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: i64,
    pub name: Option<String>,
}

/// Display fields of a product, as resolved from a weak reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product_id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
}

impl Customer {
    pub fn summary(&self, customer_id: i64) -> CustomerSummary {
        CustomerSummary {
            customer_id,
            name: self.name.clone(),
        }
    }
}

impl Product {
    pub fn summary(&self, product_id: i64) -> ProductSummary {
        ProductSummary {
            product_id,
            name: self.name.clone(),
            category: self.category.clone(),
        }
    }
}
