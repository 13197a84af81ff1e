//! HID battery driver for Rapoo composite wireless keyboards.
//!
//! Rapoo combo devices enumerate several HID interfaces; the keyboard-class
//! interface carries a vendor battery report alongside ordinary input
//! traffic. This crate classifies interfaces at bind time, extracts the
//! capacity from the battery report stream, and exposes it to an OS battery
//! registry through a generic power-supply property protocol. All other
//! interfaces are activated and left to the generic input path.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
mod macros;

pub mod consts;
pub mod errors;

mod battery;
mod driver;
mod power;
mod report;

pub use battery::{BatteryRecord, CapacityLevel, CAPACITY_UNKNOWN, MAX_MODEL_NAME};
pub use driver::{
    BindOutcome, EventChannel, HidActivate, InterfaceId, InterfaceInfo, RapooDriver, ReportBuf,
    ShutdownSignal, TransportEvent, MAX_REPORT_SIZE,
};
pub use errors::RapooError;
pub use power::{
    supply_name, PowerSupplyDesc, PowerSupplyProperty, PowerSupplyRegistry, PowerSupplyScope,
    PowerSupplyType, PropertyValue, SupplyId, BATTERY_PROPERTIES, SUPPLY_NAME_CAP,
};
pub use report::battery_capacity;
