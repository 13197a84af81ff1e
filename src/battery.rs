use core::sync::atomic::{AtomicI16, Ordering};

use arrayvec::ArrayString;

use crate::consts;
use crate::power::SupplyId;

/// Sentinel capacity for a record that has not seen a battery report yet.
pub const CAPACITY_UNKNOWN: i16 = -1;

/// Upper bound on an advertised product string kept in the record.
pub const MAX_MODEL_NAME: usize = 64;

/// Coarse battery level derived from the capacity percentage.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CapacityLevel {
    Critical,
    Low,
    Normal,
    High,
}

impl CapacityLevel {
    /// Maps a capacity percentage onto a level. All comparisons are strict,
    /// so 75 is `Normal`, 20 is `Low` and 5 is `Critical`. The unknown
    /// sentinel (−1) lands in `Critical` as well.
    pub fn from_capacity(capacity: i16) -> Self {
        if capacity > 75 {
            CapacityLevel::High
        } else if capacity > 20 {
            CapacityLevel::Normal
        } else if capacity > 5 {
            CapacityLevel::Low
        } else {
            CapacityLevel::Critical
        }
    }
}

/// Human-readable product name, resolved once at bind time.
#[derive(Debug)]
pub(crate) enum ModelName {
    /// Product id found in the driver's model table.
    Known(&'static str),
    /// Fallback: the product string the device itself advertises.
    Advertised(ArrayString<MAX_MODEL_NAME>),
}

impl ModelName {
    /// Resolves the name from the model table, falling back to the
    /// advertised string (truncated on a char boundary if oversized).
    pub(crate) fn resolve(product_id: u16, advertised: &str) -> Self {
        match consts::model_name(product_id) {
            Some(name) => ModelName::Known(name),
            None => {
                let mut name = ArrayString::new();
                for ch in advertised.chars() {
                    if name.try_push(ch).is_err() {
                        break;
                    }
                }
                ModelName::Advertised(name)
            }
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            ModelName::Known(name) => name,
            ModelName::Advertised(name) => name.as_str(),
        }
    }
}

/// Per-interface battery state: the last observed capacity, the resolved
/// model name, and the registered power-supply endpoint.
///
/// Exactly one writer mutates `capacity` (the report-delivery path); property
/// queries may read it concurrently from another execution context. A single
/// atomic scalar with release stores and acquire loads covers that without
/// any locking.
pub struct BatteryRecord {
    capacity: AtomicI16,
    model_name: ModelName,
    supply: Option<SupplyId>,
}

impl BatteryRecord {
    pub(crate) fn new(model_name: ModelName) -> Self {
        BatteryRecord {
            capacity: AtomicI16::new(CAPACITY_UNKNOWN),
            model_name,
            supply: None,
        }
    }

    /// Last observed capacity, or [`CAPACITY_UNKNOWN`] before the first
    /// valid battery report.
    pub fn capacity(&self) -> i16 {
        self.capacity.load(Ordering::Acquire)
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_str()
    }

    /// Stores a newly parsed capacity. Returns whether the value actually
    /// changed; identical values are a no-op so steady-state reports do not
    /// turn into notification storms.
    pub(crate) fn update_capacity(&self, new: i16) -> bool {
        if self.capacity.load(Ordering::Relaxed) == new {
            return false;
        }
        self.capacity.store(new, Ordering::Release);
        true
    }

    pub(crate) fn attach_supply(&mut self, id: SupplyId) {
        debug_assert!(self.supply.is_none());
        self.supply = Some(id);
    }

    pub(crate) fn supply(&self) -> Option<SupplyId> {
        self.supply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::USB_DEVICE_ID_RAPOO_VT3_MAX_GEN2;

    #[test]
    fn level_boundaries_are_strict() {
        assert_eq!(CapacityLevel::from_capacity(76), CapacityLevel::High);
        assert_eq!(CapacityLevel::from_capacity(75), CapacityLevel::Normal);
        assert_eq!(CapacityLevel::from_capacity(21), CapacityLevel::Normal);
        assert_eq!(CapacityLevel::from_capacity(20), CapacityLevel::Low);
        assert_eq!(CapacityLevel::from_capacity(6), CapacityLevel::Low);
        assert_eq!(CapacityLevel::from_capacity(5), CapacityLevel::Critical);
        assert_eq!(CapacityLevel::from_capacity(100), CapacityLevel::High);
        assert_eq!(CapacityLevel::from_capacity(0), CapacityLevel::Critical);
    }

    #[test]
    fn unknown_sentinel_classifies_as_critical() {
        assert_eq!(CapacityLevel::from_capacity(CAPACITY_UNKNOWN), CapacityLevel::Critical);
    }

    #[test]
    fn update_reports_change_only_on_differing_value() {
        let record = BatteryRecord::new(ModelName::Known("VT3 MAX Gen-2"));
        assert_eq!(record.capacity(), CAPACITY_UNKNOWN);

        assert!(record.update_capacity(30));
        assert_eq!(record.capacity(), 30);

        // Identical value: idempotent no-op.
        assert!(!record.update_capacity(30));
        assert_eq!(record.capacity(), 30);

        assert!(record.update_capacity(45));
        assert_eq!(record.capacity(), 45);
    }

    #[test]
    fn model_resolution_prefers_table_over_advertised() {
        let name = ModelName::resolve(USB_DEVICE_ID_RAPOO_VT3_MAX_GEN2, "Rapoo Gaming Keyboard");
        assert_eq!(name.as_str(), "VT3 MAX Gen-2");

        let name = ModelName::resolve(0x9999, "Rapoo Gaming Keyboard");
        assert_eq!(name.as_str(), "Rapoo Gaming Keyboard");
    }

    #[test]
    fn oversized_advertised_name_is_truncated() {
        let long: std::string::String = core::iter::repeat('x').take(200).collect();
        let name = ModelName::resolve(0x9999, &long);
        assert_eq!(name.as_str().len(), MAX_MODEL_NAME);
    }
}
