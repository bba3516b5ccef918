//! Version comparison.
//!
//! # Architecture
//!
//! - [`DualLayerComparator`]: classifies each object into one of seven
//!   [`ChangeStatus`] states using version lineage (layer 1), then refines
//!   changes and conflicts by content hash (layer 2)
//! - [`ComparisonReport`]: status and category breakdowns, impact level and
//!   risk factors
//! - [`compare_process_models`]: node and flow deltas for process models
//! - [`ThreeWayComparator`]: base/customer/vendor classification
//!
//! # Example
//!
//! ```
//! use blueprint_tools::diff::{ChangeStatus, DualLayerComparator};
//! use blueprint_tools::model::{AppObject, ObjectCore, ObjectType, SimpleObject, VersionEntry};
//! use std::sync::Arc;
//!
//! let rule = |version: &str, lineage: &[&str]| {
//!     let core = ObjectCore::new("_a-1", "getTotal", ObjectType::ExpressionRule)
//!         .with_version(version)
//!         .with_lineage(lineage.iter().map(|v| VersionEntry::new(*v)).collect())
//!         .with_raw_document(format!("<rule><versionUuid>{version}</versionUuid>1</rule>"));
//!     Arc::new(AppObject::Simple(SimpleObject::new(core)))
//! };
//!
//! let result = DualLayerComparator::new()
//!     .compare(Some(&rule("v1", &["v1"])), Some(&rule("v2", &["v2", "v1"])))
//!     .unwrap();
//! assert_eq!(result.status, ChangeStatus::NotChangedNewVersionId);
//! ```

mod comparator;
mod content_diff;
pub mod node_flow;
mod report;
mod result;
mod status;
pub mod three_way;

pub use comparator::{ComparatorConfig, DualLayerComparator};
pub use content_diff::build_content_diff;
pub use node_flow::{
    FlowChange, FlowComparison, NodeChange, NodeComparison, ProcessModelComparison,
    PropertyChange, compare_flows, compare_nodes, compare_process_models,
};
pub use report::{CategoryCounts, ComparisonReport, ImpactAssessment, ImpactLevel, RiskPolicy};
pub use result::{ComparisonResult, ContentDiff, FieldDelta, VersionInfo};
pub use status::ChangeStatus;
pub use three_way::{MergeClass, ThreeWayComparator, ThreeWayEntry, ThreeWayResult};
