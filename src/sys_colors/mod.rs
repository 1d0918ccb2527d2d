//! Access to OS-level system color slots
//!
//! The reconciler only needs two operations: read one slot and write a batch
//! of slots. Keeping them behind [`SystemColors`] lets the loop run against
//! the real Win32 API or against an in-memory table.

mod simulated;
#[cfg(windows)]
mod win32;

pub use simulated::SimulatedColors;
#[cfg(windows)]
pub use win32::Win32Colors;

use crate::color::SysColor;

/// Index of a system color slot (`COLOR_*` constants on Windows)
pub type ColorSlot = i32;

pub trait SystemColors {
    /// Current value of `slot`. Must not change any state.
    fn get(&self, slot: ColorSlot) -> SysColor;

    /// Write every `(slot, color)` pair in one call.
    /// Returns whether the host accepted the change.
    fn set(&mut self, entries: &[(ColorSlot, SysColor)]) -> bool;
}

impl<T: SystemColors + ?Sized> SystemColors for Box<T> {
    fn get(&self, slot: ColorSlot) -> SysColor {
        (**self).get(slot)
    }

    fn set(&mut self, entries: &[(ColorSlot, SysColor)]) -> bool {
        (**self).set(entries)
    }
}

/// Pick the facility for this host
///
/// The Win32 API is used on Windows unless `simulate` is set; every other
/// platform gets the in-memory table.
pub fn host_facility(simulate: bool) -> Box<dyn SystemColors> {
    #[cfg(windows)]
    {
        if !simulate {
            return Box::new(Win32Colors);
        }
    }

    if !simulate {
        tracing::warn!("no system color API on this platform, using simulated colors");
    }
    Box::new(SimulatedColors::new())
}
