//! Packed system color values
//!
//! Win32 system colors are `COLORREF`s: red in the lowest byte, then green,
//! then blue, with the top byte unused. Configuration files carry the usual
//! `#RRGGBB` notation, so decoding swaps the channel order.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::sys_color::CHANNEL_MASK;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color code {0:?}, expected #RRGGBB")]
    InvalidFormat(String),
}

/// A color in the packed `0x00BBGGRR` layout expected by `SetSysColors`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SysColor(u32);

impl SysColor {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self((blue as u32) << 16 | (green as u32) << 8 | red as u32)
    }

    /// Wrap a raw value as returned by the OS (top byte discarded)
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed & CHANNEL_MASK)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
}

/// Decode `#RRGGBB` into a packed system color.
///
/// The input must be exactly seven bytes: a leading `#` followed by six hex
/// digits (either case).
pub fn decode(hex: &str) -> Result<SysColor, ColorError> {
    let invalid = || ColorError::InvalidFormat(hex.to_string());

    let bytes = hex.as_bytes();
    if bytes.len() != 7 || bytes[0] != b'#' {
        return Err(invalid());
    }
    // from_str_radix tolerates a leading '+', so check digits up front
    if !bytes[1..].iter().all(u8::is_ascii_hexdigit) {
        return Err(invalid());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };
    let red = channel(1..3)?;
    let green = channel(3..5)?;
    let blue = channel(5..7)?;

    Ok(SysColor::from_rgb(red, green, blue))
}

impl FromStr for SysColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl fmt::Display for SysColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
    }
}
