//! Sales aggregation over resolved records
//!
//! Grouped sums by categorical attribute and metrics over predicate-selected
//! segments. Null sales contribute nothing to a sum.

pub mod groups;
pub mod segment;

pub use groups::{
    GroupTotal, SalesBreakdown, premium_distribution, sales_by, sales_by_day_of_week,
    sales_by_lifestage, sales_by_month, sales_by_premium, total_sales,
};
pub use segment::{SegmentMetrics, SegmentOutcome, evaluate_segments, segment_metrics};
