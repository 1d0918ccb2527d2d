use crate::color::SysColor;
use crate::sys_colors::{ColorSlot, SystemColors};

/// Read the value currently applied to `slot`
pub fn read_current<C: SystemColors + ?Sized>(colors: &C, slot: ColorSlot) -> SysColor {
    colors.get(slot)
}

pub fn differs(observed: SysColor, desired: SysColor) -> bool {
    observed != desired
}
