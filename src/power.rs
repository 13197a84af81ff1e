//! The power-supply side of the driver: the property protocol spoken with
//! the OS battery registry, the registration descriptor, and the bridge that
//! answers queries out of a [`BatteryRecord`].

use core::fmt::Write;

use arrayvec::ArrayString;
use static_assertions::const_assert;

use crate::battery::{BatteryRecord, CapacityLevel};
use crate::consts::MANUFACTURER;
use crate::errors::RapooError;

/// Opaque id of a registered power-supply endpoint, issued by the registry.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SupplyId(u16);

impl SupplyId {
    pub fn new(raw: u16) -> Self {
        SupplyId(raw)
    }

    pub fn raw(&self) -> u16 {
        self.0
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PowerSupplyType {
    Battery,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PowerSupplyScope {
    /// Powers the whole system.
    System,
    /// Powers one peripheral; this driver only ever reports `Device`.
    Device,
}

/// Property tags a registry may query. Only [`BATTERY_PROPERTIES`] are
/// served by this driver; the rest exist so an unsupported query is
/// representable and answered cleanly.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PowerSupplyProperty {
    Capacity,
    Scope,
    CapacityLevel,
    Manufacturer,
    ModelName,
    Status,
    Present,
    Online,
    Temp,
    VoltageNow,
}

/// Tagged scalar-or-string answer to a property query.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Int(i32),
    Level(CapacityLevel),
    Scope(PowerSupplyScope),
    Str(&'a str),
}

/// Properties the battery endpoint declares at registration time.
pub const BATTERY_PROPERTIES: &[PowerSupplyProperty] = &[
    PowerSupplyProperty::Capacity,
    PowerSupplyProperty::Scope,
    PowerSupplyProperty::CapacityLevel,
    PowerSupplyProperty::Manufacturer,
    PowerSupplyProperty::ModelName,
];

pub const SUPPLY_NAME_CAP: usize = 16;

// "rapoo-" plus two 4-digit hex ids and a separator.
const_assert!(SUPPLY_NAME_CAP >= "rapoo-".len() + 4 + 1 + 4);

/// Deterministic endpoint name derived from the USB identity, so several
/// same-type devices stay distinguishable in the registry.
pub fn supply_name(vendor_id: u16, product_id: u16) -> ArrayString<SUPPLY_NAME_CAP> {
    let mut name = ArrayString::new();
    // Guaranteed to fit by the assertion above.
    let _ = write!(name, "rapoo-{:04x}-{:04x}", vendor_id, product_id);
    name
}

/// Registration descriptor handed to the registry: endpoint name, supply
/// type and the declared property set.
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
pub struct PowerSupplyDesc {
    pub name: ArrayString<SUPPLY_NAME_CAP>,
    pub kind: PowerSupplyType,
    pub properties: &'static [PowerSupplyProperty],
}

impl PowerSupplyDesc {
    pub fn battery(vendor_id: u16, product_id: u16) -> Self {
        PowerSupplyDesc {
            name: supply_name(vendor_id, product_id),
            kind: PowerSupplyType::Battery,
            properties: BATTERY_PROPERTIES,
        }
    }
}

/// The OS battery registry the driver registers its endpoint with.
///
/// `register` may query properties for the new endpoint before it returns,
/// so the backing record must already be reachable when it is called.
/// `changed` marks previously cached query results stale; a listener
/// requerying afterwards observes the new values.
pub trait PowerSupplyRegistry {
    fn register(&mut self, desc: &PowerSupplyDesc) -> Result<SupplyId, RapooError>;
    fn unregister(&mut self, id: SupplyId);
    fn changed(&mut self, id: SupplyId);
}

impl BatteryRecord {
    /// Answers a registry property query from the cached state.
    ///
    /// The capacity passes through as-is, unknown sentinel included; its
    /// level is derived on the fly. Tags outside the declared set answer
    /// [`RapooError::PropertyNotSupported`] without touching any state.
    pub fn get_property(&self, prop: PowerSupplyProperty) -> Result<PropertyValue<'_>, RapooError> {
        match prop {
            PowerSupplyProperty::Capacity => Ok(PropertyValue::Int(self.capacity() as i32)),
            PowerSupplyProperty::Scope => Ok(PropertyValue::Scope(PowerSupplyScope::Device)),
            PowerSupplyProperty::CapacityLevel => Ok(PropertyValue::Level(
                CapacityLevel::from_capacity(self.capacity()),
            )),
            PowerSupplyProperty::Manufacturer => Ok(PropertyValue::Str(MANUFACTURER)),
            PowerSupplyProperty::ModelName => Ok(PropertyValue::Str(self.model_name())),
            _ => Err(RapooError::PropertyNotSupported),
        }
    }
}
