//! Segment statistics aggregation.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, ToPrimitive};
use custlysis_core::reports::SegmentStat;
use custlysis_core::types::SegmentAssignment;
use tracing::debug;

/// Groups assignments by segment and computes count, share and mean score.
///
/// Counts assignment records, so a customer listed twice in one segment is
/// counted twice. Output is ordered by `segment_id`.
pub fn compute_segment_stats(assignments: &[SegmentAssignment]) -> Vec<SegmentStat> {
    let mut groups: BTreeMap<&str, Vec<&SegmentAssignment>> = BTreeMap::new();
    for assignment in assignments {
        groups
            .entry(assignment.segment_id.as_str())
            .or_default()
            .push(assignment);
    }

    let total = assignments.len() as u64;
    let stats: Vec<SegmentStat> = groups
        .into_iter()
        .map(|(segment_id, members)| segment_stat(segment_id, &members, total))
        .collect();

    debug!(assignments = total, segments = stats.len(), "Computed segment stats");
    stats
}

fn segment_stat(segment_id: &str, members: &[&SegmentAssignment], total: u64) -> SegmentStat {
    let count = members.len() as u64;
    let percentage = if total > 0 {
        count as f64 * 100.0 / total as f64
    } else {
        0.0
    };

    let sum: BigDecimal = members.iter().filter_map(|m| m.score).filter_map(decimal).sum();
    let avg_score = if count > 0 {
        mean_half_up(&sum, count).to_f64().unwrap_or(0.0)
    } else {
        0.0
    };

    let segment_name = members
        .first()
        .map(|m| m.segment_name.clone())
        .unwrap_or_else(|| segment_id.to_string());

    SegmentStat {
        segment_id: segment_id.to_string(),
        segment_name,
        customer_count: count,
        percentage,
        avg_score,
    }
}

/// The decimal a score was written as: `10.005` is exactly 10.005, not the
/// nearest binary float.
fn decimal(score: f64) -> Option<BigDecimal> {
    BigDecimal::from_str(&score.to_string()).ok()
}

/// `sum / count` rounded half away from zero to two fraction digits, with no
/// intermediate rounding.
fn mean_half_up(sum: &BigDecimal, count: u64) -> BigDecimal {
    // sum * 100 == digits * 10^-scale
    let (digits, scale) = (sum.clone() * BigDecimal::from(100)).as_bigint_and_exponent();
    let (numerator, denominator) = if scale > 0 {
        (digits, BigInt::from(count) * BigInt::from(10u32).pow(scale as u32))
    } else {
        (digits * BigInt::from(10u32).pow(scale.unsigned_abs() as u32), BigInt::from(count))
    };

    let mut hundredths = &numerator / &denominator;
    let remainder = &numerator % &denominator;
    if remainder.magnitude() * 2u32 >= *denominator.magnitude() {
        hundredths += if numerator.sign() == Sign::Minus { -1 } else { 1 };
    }
    BigDecimal::new(hundredths, 2)
}
