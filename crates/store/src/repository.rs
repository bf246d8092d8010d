//! Generic keyed repository backed by an ordered map.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use custlysis_core::types::{
    Account, CampaignResponse, Customer, Interaction, Product, RecommendationRecord,
    SegmentAssignment, SegmentKey, Transaction,
};
use custlysis_core::{CustlysisError, CustlysisResult};
use parking_lot::RwLock;
use tracing::debug;

/// A storable record with a primary key.
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: Ord + Clone + fmt::Display + Send + Sync + 'static;

    /// Name used in logs and error messages.
    const NAME: &'static str;

    fn key(&self) -> Option<Self::Key>;

    fn set_key(&mut self, key: Self::Key);

    /// Key for a new record saved without one. `last` is the highest key
    /// ever stored. `None` means the entity has no generated keys.
    fn next_key(last: Option<&Self::Key>) -> Option<Self::Key> {
        let _ = last;
        None
    }

    /// Fill creation timestamps that the caller left empty.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}
}

struct Records<E: Entity> {
    rows: BTreeMap<E::Key, E>,
    /// Highest key ever inserted, so generated keys are never reused.
    high_water: Option<E::Key>,
}

/// Thread-safe table of one entity type. `find_all` returns rows in key order.
pub struct Repository<E: Entity> {
    records: RwLock<Records<E>>,
}

impl<E: Entity> Repository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records {
                rows: BTreeMap::new(),
                high_water: None,
            }),
        }
    }

    pub fn find_all(&self) -> Vec<E> {
        self.records.read().rows.values().cloned().collect()
    }

    pub fn find_by_id(&self, key: &E::Key) -> Option<E> {
        self.records.read().rows.get(key).cloned()
    }

    pub fn exists_by_id(&self, key: &E::Key) -> bool {
        self.records.read().rows.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace. A record without a key gets a generated one; a
    /// record whose key is new gets its creation timestamps filled.
    pub fn save(&self, mut entity: E) -> CustlysisResult<E> {
        let mut records = self.records.write();

        let key = match entity.key() {
            Some(key) => key,
            None => {
                let key = E::next_key(records.high_water.as_ref())
                    .ok_or(CustlysisError::MissingKey(E::NAME))?;
                entity.set_key(key.clone());
                key
            }
        };

        if !records.rows.contains_key(&key) {
            entity.stamp_created(Utc::now());
        }
        if records.high_water.as_ref().map_or(true, |hw| key > *hw) {
            records.high_water = Some(key.clone());
        }

        debug!(entity = E::NAME, key = %key, "Saved record");
        records.rows.insert(key, entity.clone());
        Ok(entity)
    }

    /// Replace an existing record, forcing its key to `key`. `None` if absent.
    pub fn update(&self, key: &E::Key, mut entity: E) -> CustlysisResult<Option<E>> {
        if !self.exists_by_id(key) {
            return Ok(None);
        }
        entity.set_key(key.clone());
        self.save(entity).map(Some)
    }

    /// Returns whether a record was removed.
    pub fn delete_by_id(&self, key: &E::Key) -> bool {
        let removed = self.records.write().rows.remove(key).is_some();
        if removed {
            debug!(entity = E::NAME, key = %key, "Deleted record");
        }
        removed
    }
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Entity impls ──────────────────────────────────────────────────────────

macro_rules! identity_entity {
    ($ty:ty, $name:literal, $key:ident $(, created = $stamp:ident)?) => {
        impl Entity for $ty {
            type Key = i64;
            const NAME: &'static str = $name;

            fn key(&self) -> Option<i64> {
                self.$key
            }

            fn set_key(&mut self, key: i64) {
                self.$key = Some(key);
            }

            fn next_key(last: Option<&i64>) -> Option<i64> {
                Some(last.map_or(1, |k| k + 1))
            }

            $(
                fn stamp_created(&mut self, now: DateTime<Utc>) {
                    self.$stamp.get_or_insert(now);
                }
            )?
        }
    };
}

identity_entity!(Customer, "customer", customer_id, created = created_at);
identity_entity!(Product, "product", product_id);
identity_entity!(Account, "account", account_id);
identity_entity!(Transaction, "transaction", txn_id);
identity_entity!(CampaignResponse, "campaign_response", response_id, created = timestamp);
identity_entity!(Interaction, "interaction", interaction_id);
identity_entity!(RecommendationRecord, "recommendation", rec_id, created = timestamp);

impl Entity for SegmentAssignment {
    type Key = SegmentKey;
    const NAME: &'static str = "segment_assignment";

    fn key(&self) -> Option<SegmentKey> {
        Some(SegmentAssignment::key(self))
    }

    fn set_key(&mut self, key: SegmentKey) {
        self.customer_id = key.customer_id;
        self.segment_id = key.segment_id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.assigned_on.get_or_insert(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str) -> Customer {
        Customer {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_generated_keys_are_sequential() {
        let repo = Repository::<Customer>::new();
        let a = repo.save(customer("a")).unwrap();
        let b = repo.save(customer("b")).unwrap();
        assert_eq!(a.customer_id, Some(1));
        assert_eq!(b.customer_id, Some(2));
        assert!(a.created_at.is_some());
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_generated_keys_are_not_reused_after_delete() {
        let repo = Repository::<Customer>::new();
        repo.save(customer("a")).unwrap();
        let b = repo.save(customer("b")).unwrap();
        assert!(repo.delete_by_id(&2));
        let c = repo.save(customer("c")).unwrap();
        assert_ne!(c.customer_id, b.customer_id);
        assert_eq!(c.customer_id, Some(3));
    }

    #[test]
    fn test_explicit_key_is_kept() {
        let repo = Repository::<Product>::new();
        let saved = repo
            .save(Product {
                product_id: Some(40),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(saved.product_id, Some(40));
        let next = repo.save(Product::default()).unwrap();
        assert_eq!(next.product_id, Some(41));
    }

    #[test]
    fn test_update_requires_existing_record() {
        let repo = Repository::<Customer>::new();
        assert!(repo.update(&9, customer("ghost")).unwrap().is_none());
        assert!(!repo.exists_by_id(&9));

        repo.save(customer("before")).unwrap();
        let updated = repo.update(&1, customer("after")).unwrap().unwrap();
        assert_eq!(updated.customer_id, Some(1));
        assert_eq!(repo.find_by_id(&1).unwrap().name.as_deref(), Some("after"));
    }

    #[test]
    fn test_delete_reports_absence() {
        let repo = Repository::<Account>::new();
        assert!(!repo.delete_by_id(&1));
    }

    #[test]
    fn test_segment_assignments_keyed_by_pair() {
        let repo = Repository::<SegmentAssignment>::new();
        repo.save(SegmentAssignment::new(2, "S1", "Digital", Some(1.0))).unwrap();
        repo.save(SegmentAssignment::new(1, "S2", "New", None)).unwrap();
        repo.save(SegmentAssignment::new(1, "S1", "Digital", None)).unwrap();
        // Same key replaces.
        let replaced = repo
            .save(SegmentAssignment::new(2, "S1", "Digital Natives", Some(2.0)))
            .unwrap();
        assert!(replaced.assigned_on.is_none());

        let keys: Vec<String> = repo.find_all().iter().map(|a| a.key().to_string()).collect();
        assert_eq!(keys, vec!["1/S1", "1/S2", "2/S1"]);

        let key = SegmentKey {
            customer_id: 2,
            segment_id: "S1".to_string(),
        };
        assert_eq!(repo.find_by_id(&key).unwrap().segment_name, "Digital Natives");
        assert!(repo.find_by_id(&SegmentKey { customer_id: 3, segment_id: "S1".to_string() }).is_none());
    }
}
