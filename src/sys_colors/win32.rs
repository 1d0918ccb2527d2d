#![allow(unsafe_code)]

use windows_sys::Win32::Graphics::Gdi::{GetSysColor, SetSysColors};

use super::{ColorSlot, SystemColors};
use crate::color::SysColor;

/// System colors of the interactive Windows session
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Colors;

impl SystemColors for Win32Colors {
    fn get(&self, slot: ColorSlot) -> SysColor {
        // GetSysColor has no failure mode; unknown slots read as 0
        let packed = unsafe { GetSysColor(slot) };
        SysColor::from_packed(packed)
    }

    fn set(&mut self, entries: &[(ColorSlot, SysColor)]) -> bool {
        if entries.is_empty() {
            return true;
        }
        let slots: Vec<i32> = entries.iter().map(|(slot, _)| *slot).collect();
        let colors: Vec<u32> = entries.iter().map(|(_, color)| color.packed()).collect();

        let Ok(count) = i32::try_from(entries.len()) else {
            return false;
        };
        // Both arrays outlive the call and hold `count` elements
        let accepted = unsafe { SetSysColors(count, slots.as_ptr(), colors.as_ptr()) };
        accepted != 0
    }
}
