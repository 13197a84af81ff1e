use crate::consts::{BATTERY_CAPACITY_INDEX, BATTERY_REPORT_SIZE};

/// Extracts the raw capacity percentage from a vendor battery report.
///
/// Recognition is by length alone: only an exactly [`BATTERY_REPORT_SIZE`]
/// byte frame is a battery report. Every other shape is regular keyboard
/// traffic on the same channel and yields `None`. The capacity byte is
/// passed through untouched; the device encodes 0–100 but nothing here
/// enforces that.
pub fn battery_capacity(data: &[u8]) -> Option<u8> {
    if data.len() != BATTERY_REPORT_SIZE {
        return None;
    }
    Some(data[BATTERY_CAPACITY_INDEX])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery_report(capacity: u8) -> [u8; BATTERY_REPORT_SIZE] {
        let mut report = [0u8; BATTERY_REPORT_SIZE];
        report[BATTERY_CAPACITY_INDEX] = capacity;
        report
    }

    #[test]
    fn extracts_capacity_from_battery_report() {
        assert_eq!(battery_capacity(&battery_report(87)), Some(87));
        assert_eq!(battery_capacity(&battery_report(0)), Some(0));
        assert_eq!(battery_capacity(&battery_report(100)), Some(100));
    }

    #[test]
    fn other_lengths_are_ignored() {
        assert_eq!(battery_capacity(&[]), None);
        assert_eq!(battery_capacity(&[0x55; 8]), None);
        assert_eq!(battery_capacity(&[0x55; 12]), None);
        assert_eq!(battery_capacity(&[0x55; 14]), None);
        assert_eq!(battery_capacity(&[0x55; 64]), None);
    }

    #[test]
    fn out_of_range_bytes_pass_through() {
        // The device is trusted; 0–100 is expected but not enforced.
        assert_eq!(battery_capacity(&battery_report(0xff)), Some(0xff));
    }
}
