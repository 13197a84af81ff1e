#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RapooError {
    /// Standard HID report-descriptor parsing failed during activation.
    HidParse,
    /// Starting the interface hardware failed during activation.
    HidStart,
    /// The interface id does not fit the driver's fixed interface table.
    NoFreeSlot,
    /// A bind arrived for an interface that already holds a live binding.
    AlreadyBound,
    /// The power-supply registry refused to register the battery endpoint.
    RegistryRejected,
    /// The interface has no battery record attached (never bound, ignored,
    /// or already unbound).
    NotBound,
    /// The queried power-supply property is outside the supported set.
    /// Expected and non-fatal.
    PropertyNotSupported,
}
