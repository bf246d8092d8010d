//! Segment analytics: per-segment statistics and current-segment lookup over
//! the assignment records produced by the segmentation model.

pub mod lookup;
pub mod stats;

pub use lookup::{SegmentLookup, UNASSIGNED_SEGMENT};
pub use stats::compute_segment_stats;
