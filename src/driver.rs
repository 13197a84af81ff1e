//! Driver core: owns the per-interface table, classifies interfaces at bind
//! time, routes raw reports into the battery cache and bridges registry
//! queries to the owned record.

use arrayvec::ArrayVec;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::battery::{BatteryRecord, ModelName};
use crate::consts::CollectionUsage;
use crate::errors::RapooError;
use crate::power::{PowerSupplyDesc, PowerSupplyProperty, PowerSupplyRegistry, PropertyValue};
use crate::report;

/// Largest raw report the transport is expected to hand over.
pub const MAX_REPORT_SIZE: usize = 64;

pub type ReportBuf = ArrayVec<u8, MAX_REPORT_SIZE>;
pub type EventChannel = Channel<CriticalSectionRawMutex, TransportEvent, 8>;
pub type ShutdownSignal = Signal<CriticalSectionRawMutex, ()>;

/// Index of a logical interface within the composite device.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InterfaceId(u8);

impl InterfaceId {
    pub fn new(raw: u8) -> Self {
        InterfaceId(raw)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }
}

/// Bind-time identity of a newly enumerated interface.
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
pub struct InterfaceInfo<'a> {
    pub iface: InterfaceId,
    /// Top-level application collection usage (`page << 16 | usage`).
    pub usage: u32,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Product string the device advertises; model-name fallback.
    pub advertised_name: &'a str,
}

/// Standard HID activation steps, performed by the transport stack.
///
/// Both steps run for every interface of the composite device, owned or
/// not, so the generic keyboard/mouse input path keeps working.
pub trait HidActivate {
    fn hid_parse(&mut self) -> Result<(), RapooError>;
    fn hid_start(&mut self) -> Result<(), RapooError>;
}

/// Outcome of classifying a freshly bound interface.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// Keyboard-class interface; it carries the battery telemetry.
    Owned,
    /// Activated and left to the generic input path.
    Ignored,
}

/// Per-slot state. Absence of a binding and a deliberately ignored
/// interface are distinct states, not a null back-reference.
enum InterfaceState {
    Vacant,
    Ignored,
    Owned(BatteryRecord),
}

/// Event stream from the transport layer into [`RapooDriver::run`].
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
pub enum TransportEvent {
    Report { iface: InterfaceId, data: ReportBuf },
    Unbind(InterfaceId),
    /// The whole composite device is gone.
    Detached,
}

impl TransportEvent {
    /// Copies a raw report into an owned event. `None` if the buffer
    /// exceeds [`MAX_REPORT_SIZE`].
    pub fn report(iface: InterfaceId, data: &[u8]) -> Option<Self> {
        let data = ReportBuf::try_from(data).ok()?;
        Some(TransportEvent::Report { iface, data })
    }
}

/// HID battery driver for Rapoo composite wireless keyboards.
///
/// Generic over the power-supply registry it registers endpoints with,
/// with a fixed-size interface table sized for the composite devices this
/// driver binds to.
pub struct RapooDriver<R: PowerSupplyRegistry, const NR_INTERFACES: usize = 4> {
    registry: R,
    slots: [InterfaceState; NR_INTERFACES],
}

impl<R: PowerSupplyRegistry, const NR_INTERFACES: usize> RapooDriver<R, NR_INTERFACES> {
    pub fn new(registry: R) -> Self {
        RapooDriver {
            registry,
            slots: core::array::from_fn(|_| InterfaceState::Vacant),
        }
    }

    fn index(iface: InterfaceId) -> Result<usize, RapooError> {
        let idx = iface.raw() as usize;
        if idx < NR_INTERFACES {
            Ok(idx)
        } else {
            Err(RapooError::NoFreeSlot)
        }
    }

    /// Bind hook for a newly enumerated interface.
    ///
    /// Activation runs first on every path. The interface is then either
    /// ignored (non-keyboard collections stay on the generic input path) or
    /// owned: the battery record goes into the table, the power-supply
    /// endpoint is registered, and the returned id is attached. A failed
    /// registration reverts the slot, so no partial record survives.
    pub fn on_bind<A: HidActivate>(
        &mut self,
        hid: &mut A,
        info: &InterfaceInfo,
    ) -> Result<BindOutcome, RapooError> {
        hid.hid_parse()?;
        hid.hid_start()?;

        let idx = Self::index(info.iface)?;
        if !matches!(self.slots[idx], InterfaceState::Vacant) {
            return Err(RapooError::AlreadyBound);
        }

        if CollectionUsage::try_from(info.usage) != Ok(CollectionUsage::Keyboard) {
            info!("skipping non-keyboard interface {}", info.iface.raw());
            self.slots[idx] = InterfaceState::Ignored;
            return Ok(BindOutcome::Ignored);
        }

        let model = ModelName::resolve(info.product_id, info.advertised_name);
        info!("keyboard interface {}: battery reporting enabled", info.iface.raw());
        debug!("detected model: {}", model.as_str());

        // The registry may query the endpoint while register is still
        // running, so the record must be reachable through the table first.
        self.slots[idx] = InterfaceState::Owned(BatteryRecord::new(model));
        let desc = PowerSupplyDesc::battery(info.vendor_id, info.product_id);
        match self.registry.register(&desc) {
            Ok(id) => {
                if let InterfaceState::Owned(record) = &mut self.slots[idx] {
                    record.attach_supply(id);
                }
                Ok(BindOutcome::Owned)
            }
            Err(e) => {
                error!("power-supply registration failed for interface {}", info.iface.raw());
                self.slots[idx] = InterfaceState::Vacant;
                Err(e)
            }
        }
    }

    /// Raw-report hook, one call per incoming report on any interface.
    ///
    /// Reports for vacant or ignored slots and frames that are not the
    /// battery report are dropped without touching any state. A recognized
    /// frame updates the cache, and the registry is told iff the capacity
    /// actually changed.
    pub fn on_report(&mut self, iface: InterfaceId, data: &[u8]) {
        let Ok(idx) = Self::index(iface) else {
            return;
        };
        let InterfaceState::Owned(record) = &self.slots[idx] else {
            return;
        };
        let Some(capacity) = report::battery_capacity(data) else {
            return;
        };
        if record.update_capacity(capacity as i16) {
            trace!("interface {} capacity now {}%", iface.raw(), capacity);
            if let Some(id) = record.supply() {
                self.registry.changed(id);
            }
        }
    }

    /// Unbind hook; tears down the slot and deregisters an owned record's
    /// endpoint. The slot is replaced wholesale, so deregistration cannot
    /// run twice even if the transport delivers a duplicate unbind.
    pub fn on_unbind(&mut self, iface: InterfaceId) {
        let Ok(idx) = Self::index(iface) else {
            return;
        };
        if let InterfaceState::Owned(record) =
            core::mem::replace(&mut self.slots[idx], InterfaceState::Vacant)
        {
            if let Some(id) = record.supply() {
                self.registry.unregister(id);
            }
            info!("unbound battery interface {}", iface.raw());
        }
    }

    /// Bridges a registry property query to the interface's record.
    pub fn get_property(
        &self,
        iface: InterfaceId,
        prop: PowerSupplyProperty,
    ) -> Result<PropertyValue<'_>, RapooError> {
        let idx = Self::index(iface).map_err(|_| RapooError::NotBound)?;
        match &self.slots[idx] {
            InterfaceState::Owned(record) => record.get_property(prop),
            _ => Err(RapooError::NotBound),
        }
    }

    /// The battery record bound to an interface, if it owns one.
    pub fn record(&self, iface: InterfaceId) -> Option<&BatteryRecord> {
        match self.slots.get(iface.raw() as usize)? {
            InterfaceState::Owned(record) => Some(record),
            _ => None,
        }
    }

    /// Drives the driver from the transport's event stream until the device
    /// detaches or the shutdown signal fires; either way every interface is
    /// unbound before returning.
    pub async fn run(&mut self, events: &EventChannel, shutdown: &ShutdownSignal) {
        loop {
            match select(events.receive(), shutdown.wait()).await {
                Either::First(TransportEvent::Report { iface, data }) => {
                    self.on_report(iface, &data)
                }
                Either::First(TransportEvent::Unbind(iface)) => self.on_unbind(iface),
                Either::First(TransportEvent::Detached) | Either::Second(()) => {
                    self.detach_all();
                    return;
                }
            }
        }
    }

    fn detach_all(&mut self) {
        for i in 0..NR_INTERFACES {
            self.on_unbind(InterfaceId::new(i as u8));
        }
    }
}
