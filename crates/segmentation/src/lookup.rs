//! Current-segment lookup.
//!
//! A customer's "current" segment is the first assignment for that customer
//! in the order the store returned them. `assigned_on` is not consulted.

use std::collections::HashMap;

use custlysis_core::types::SegmentAssignment;

/// Segment name reported for a customer with no assignment.
pub const UNASSIGNED_SEGMENT: &str = "Unassigned";

pub struct SegmentLookup<'a> {
    current: HashMap<i64, &'a SegmentAssignment>,
}

impl<'a> SegmentLookup<'a> {
    pub fn build(assignments: &'a [SegmentAssignment]) -> Self {
        let mut current = HashMap::with_capacity(assignments.len());
        for assignment in assignments {
            current.entry(assignment.customer_id).or_insert(assignment);
        }
        Self { current }
    }

    pub fn current(&self, customer_id: i64) -> Option<&'a SegmentAssignment> {
        self.current.get(&customer_id).copied()
    }

    /// Name of the customer's current segment, or [`UNASSIGNED_SEGMENT`].
    pub fn segment_name(&self, customer_id: i64) -> &'a str {
        self.current(customer_id)
            .map(|a| a.segment_name.as_str())
            .unwrap_or(UNASSIGNED_SEGMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_encountered_assignment_wins() {
        let assignments = vec![
            SegmentAssignment::new(1, "S9", "At-Risk", None),
            SegmentAssignment::new(2, "S1", "Digital Savers", None),
            SegmentAssignment::new(1, "S1", "Digital Savers", None),
        ];
        let lookup = SegmentLookup::build(&assignments);
        assert_eq!(lookup.segment_name(1), "At-Risk");
        assert_eq!(lookup.current(1).map(|a| a.segment_id.as_str()), Some("S9"));
        assert_eq!(lookup.segment_name(2), "Digital Savers");
    }

    #[test]
    fn test_unassigned_customer() {
        let lookup = SegmentLookup::build(&[]);
        assert!(lookup.current(42).is_none());
        assert_eq!(lookup.segment_name(42), UNASSIGNED_SEGMENT);
    }
}
