//! Three-way classification of base, customer and vendor versions.

use super::{
    ChangeStatus, ComparisonResult, DualLayerComparator, ProcessModelComparison,
    compare_process_models,
};
use crate::error::Result;
use crate::model::{AppObject, ObjectDirectory, ObjectType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// How an object moved relative to the common base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeClass {
    NoChange,
    CustomerOnly,
    VendorOnly,
    /// Both sides changed to the same content
    BothIdentical,
    Conflict,
}

impl fmt::Display for MergeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoChange => "no change",
            Self::CustomerOnly => "customer only",
            Self::VendorOnly => "vendor only",
            Self::BothIdentical => "both identical",
            Self::Conflict => "conflict",
        })
    }
}

/// Classification of one UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeWayEntry {
    pub uuid: String,
    pub name: String,
    pub object_type: ObjectType,
    pub class: MergeClass,
    /// Base → customer status; `None` when absent from both
    pub customer_status: Option<ChangeStatus>,
    /// Base → vendor status; `None` when absent from both
    pub vendor_status: Option<ChangeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_flows: Option<ProcessModelComparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_flows: Option<ProcessModelComparison>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreeWayResult {
    pub entries: Vec<ThreeWayEntry>,
    pub counts: BTreeMap<MergeClass, usize>,
}

impl ThreeWayResult {
    #[must_use]
    pub fn conflicts(&self) -> usize {
        self.counts.get(&MergeClass::Conflict).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|e| e.class != MergeClass::NoChange)
    }
}

/// Side-specific view of a comparison against base.
struct Side<'r> {
    result: Option<&'r ComparisonResult>,
}

impl<'r> Side<'r> {
    const fn new(result: Option<&'r ComparisonResult>) -> Self {
        Self { result }
    }

    fn status(&self) -> Option<ChangeStatus> {
        self.result.map(|r| r.status)
    }

    /// Object on this side, `None` when absent.
    fn object(&self) -> Option<&AppObject> {
        self.result.and_then(ComparisonResult::new_object)
    }
}

/// Runs the comparator for base→customer and base→vendor and merges the
/// verdicts per UUID.
#[derive(Debug, Clone, Default)]
pub struct ThreeWayComparator {
    comparator: DualLayerComparator,
}

impl ThreeWayComparator {
    #[must_use]
    pub const fn new(comparator: DualLayerComparator) -> Self {
        Self { comparator }
    }

    fn same_content(&self, a: Option<&AppObject>, b: Option<&AppObject>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                let (Some(ha), Some(hb)) = (self.comparator.diff_hash(a), self.comparator.diff_hash(b))
                else {
                    return false;
                };
                matches!((ha.digest(), hb.digest()), (Some(x), Some(y)) if x == y)
            }
            _ => false,
        }
    }

    /// Whether a side differs from base. Unknown versions fall back to content.
    fn side_changed(&self, base: Option<&AppObject>, side: &Side<'_>) -> bool {
        match side.status() {
            None | Some(ChangeStatus::NotChanged | ChangeStatus::NotChangedNewVersionId) => false,
            Some(ChangeStatus::Unknown) => !self.same_content(base, side.object()),
            Some(_) => true,
        }
    }

    pub fn compare(
        &self,
        base: &ObjectDirectory,
        customer: &ObjectDirectory,
        vendor: &ObjectDirectory,
    ) -> Result<ThreeWayResult> {
        let customer_results = self.comparator.compare_directories(base, customer)?;
        let vendor_results = self.comparator.compare_directories(base, vendor)?;
        let by_uuid = |results: &[ComparisonResult]| -> BTreeMap<String, usize> {
            results
                .iter()
                .enumerate()
                .map(|(i, r)| (r.uuid().to_string(), i))
                .collect()
        };
        let customer_index = by_uuid(&customer_results);
        let vendor_index = by_uuid(&vendor_results);

        let uuids: BTreeSet<&String> = customer_index.keys().chain(vendor_index.keys()).collect();
        let mut result = ThreeWayResult::default();

        for uuid in uuids {
            let customer = Side::new(customer_index.get(uuid).map(|&i| &customer_results[i]));
            let vendor = Side::new(vendor_index.get(uuid).map(|&i| &vendor_results[i]));
            let base_object = base.get(uuid).map(Arc::as_ref);

            let customer_changed = self.side_changed(base_object, &customer);
            let vendor_changed = self.side_changed(base_object, &vendor);
            let class = match (customer_changed, vendor_changed) {
                (false, false) => MergeClass::NoChange,
                (true, false) => MergeClass::CustomerOnly,
                (false, true) => MergeClass::VendorOnly,
                (true, true) if self.same_content(customer.object(), vendor.object()) => {
                    MergeClass::BothIdentical
                }
                (true, true) => MergeClass::Conflict,
            };

            let (customer_flows, vendor_flows) = match class {
                MergeClass::BothIdentical | MergeClass::Conflict => {
                    let base_pm = base_object.and_then(AppObject::as_process_model);
                    let flows = |side: &Side<'_>| {
                        let side_pm = side.object().and_then(AppObject::as_process_model)?;
                        Some(compare_process_models(base_pm?, side_pm))
                    };
                    (flows(&customer), flows(&vendor))
                }
                _ => (None, None),
            };

            let Some(representative) = customer
                .result
                .or(vendor.result)
                .map(|r| Arc::clone(&r.object))
            else {
                continue;
            };
            if class == MergeClass::Conflict {
                tracing::debug!(uuid = %uuid, name = %representative.name(), "three-way conflict");
            }
            *result.counts.entry(class).or_default() += 1;
            result.entries.push(ThreeWayEntry {
                uuid: uuid.clone(),
                name: representative.name().to_string(),
                object_type: representative.object_type().clone(),
                class,
                customer_status: customer.status(),
                vendor_status: vendor.status(),
                customer_flows,
                vendor_flows,
            });
        }

        tracing::info!(
            total = result.entries.len(),
            conflicts = result.conflicts(),
            "three-way comparison complete"
        );
        Ok(result)
    }
}
