use std::collections::HashMap;

use tracing::debug;

use super::{ColorSlot, SystemColors};
use crate::color::SysColor;

/// In-memory color table
///
/// Unset slots read as black. A rejecting table refuses every write and
/// leaves its values untouched, like a failed `SetSysColors` call.
#[derive(Debug, Default, Clone)]
pub struct SimulatedColors {
    slots: HashMap<ColorSlot, SysColor>,
    reject_writes: bool,
    write_calls: usize,
}

impl SimulatedColors {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn rejecting() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn with_slot(mut self, slot: ColorSlot, color: SysColor) -> Self {
        self.slots.insert(slot, color);
        self
    }

    #[cfg(test)]
    /// Change a slot from outside, as another program would
    pub fn overwrite(&mut self, slot: ColorSlot, color: SysColor) {
        self.slots.insert(slot, color);
    }

    #[cfg(test)]
    /// Number of `set` calls seen so far, accepted or not
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }
}

impl SystemColors for SimulatedColors {
    fn get(&self, slot: ColorSlot) -> SysColor {
        self.slots.get(&slot).copied().unwrap_or_default()
    }

    fn set(&mut self, entries: &[(ColorSlot, SysColor)]) -> bool {
        self.write_calls += 1;
        if self.reject_writes {
            debug!(entries = entries.len(), "simulated write rejected");
            return false;
        }
        for (slot, color) in entries {
            debug!(slot, color = %color, writes = self.write_calls, "simulated write");
            self.slots.insert(*slot, *color);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_slot_reads_black() {
        let colors = SimulatedColors::new();
        assert_eq!(colors.get(1), SysColor::from_rgb(0, 0, 0));
    }

    #[test]
    fn test_set_updates_all_entries() {
        let mut colors = SimulatedColors::new();
        let red = SysColor::from_rgb(255, 0, 0);
        let blue = SysColor::from_rgb(0, 0, 255);

        assert!(colors.set(&[(1, red), (5, blue)]));
        assert_eq!(colors.get(1), red);
        assert_eq!(colors.get(5), blue);
        assert_eq!(colors.write_calls(), 1);
    }

    #[test]
    fn test_rejecting_table_keeps_values() {
        let grey = SysColor::from_rgb(0x80, 0x80, 0x80);
        let mut colors = SimulatedColors::rejecting().with_slot(1, grey);

        assert!(!colors.set(&[(1, SysColor::from_rgb(1, 2, 3))]));
        assert_eq!(colors.get(1), grey);
        assert_eq!(colors.write_calls(), 1);
    }

    #[test]
    fn test_boxed_facility_delegates() {
        let mut boxed: Box<dyn SystemColors> = Box::new(SimulatedColors::new());
        let green = SysColor::from_rgb(0, 255, 0);
        assert!(boxed.set(&[(1, green)]));
        assert_eq!(boxed.get(1), green);
    }
}
