use static_assertions::const_assert;

pub const USB_VENDOR_ID_RAPOO: u16 = 0x24ae;
pub const USB_DEVICE_ID_RAPOO_VT3_MAX_GEN2: u16 = 0x1417;

/// Vendor string reported through the power-supply MANUFACTURER property.
pub const MANUFACTURER: &str = "Rapoo";

/// The vendor battery report is a fixed-size frame; anything else on the
/// interrupt channel is ordinary input traffic and not ours to interpret.
pub const BATTERY_REPORT_SIZE: usize = 13;

/// Byte offset of the raw capacity percentage within the battery report.
pub const BATTERY_CAPACITY_INDEX: usize = 8;

const_assert!(BATTERY_CAPACITY_INDEX < BATTERY_REPORT_SIZE);

/// Top-level HID collection usages, encoded as `page << 16 | usage` the way
/// the host stack reports them for an interface's application collection.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(not(feature = "defmt"), derive(Debug))]
pub enum CollectionUsage {
    /// Generic desktop pointer collection
    Pointer         = 0x0001_0001,
    /// Generic desktop mouse (the pointing half of a combo device)
    Mouse           = 0x0001_0002,
    /// Generic desktop joystick
    Joystick        = 0x0001_0004,
    /// Generic desktop game pad
    GamePad         = 0x0001_0005,
    /// Generic desktop keyboard – the interface that carries battery telemetry
    Keyboard        = 0x0001_0006,
    /// Generic desktop keypad
    Keypad          = 0x0001_0007,
    /// Consumer control collection (media keys)
    ConsumerControl = 0x000c_0001,
}

impl TryFrom<u32> for CollectionUsage {
    type Error = ();

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0x0001_0001 => Ok(CollectionUsage::Pointer),
            0x0001_0002 => Ok(CollectionUsage::Mouse),
            0x0001_0004 => Ok(CollectionUsage::Joystick),
            0x0001_0005 => Ok(CollectionUsage::GamePad),
            0x0001_0006 => Ok(CollectionUsage::Keyboard),
            0x0001_0007 => Ok(CollectionUsage::Keypad),
            0x000c_0001 => Ok(CollectionUsage::ConsumerControl),
            _           => Err(()),
        }
    }
}

impl From<CollectionUsage> for u32 {
    fn from(usage: CollectionUsage) -> Self {
        usage as u32
    }
}

/// Product-id-to-name table for devices this driver knows by name.
///
/// Unmapped products fall back to the interface's advertised product string.
#[inline]
pub fn model_name(product_id: u16) -> Option<&'static str> {
    match product_id {
        USB_DEVICE_ID_RAPOO_VT3_MAX_GEN2 => Some("VT3 MAX Gen-2"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_product_has_model_name() {
        assert_eq!(model_name(USB_DEVICE_ID_RAPOO_VT3_MAX_GEN2), Some("VT3 MAX Gen-2"));
    }

    #[test]
    fn unknown_product_has_no_model_name() {
        assert_eq!(model_name(0x0000), None);
        assert_eq!(model_name(0x1418), None);
    }

    #[test]
    fn keyboard_usage_round_trips() {
        let code: u32 = CollectionUsage::Keyboard.into();
        assert_eq!(code, 0x0001_0006);
        assert_eq!(CollectionUsage::try_from(code), Ok(CollectionUsage::Keyboard));
        assert_eq!(CollectionUsage::try_from(0x0001_0003u32), Err(()));
    }
}
