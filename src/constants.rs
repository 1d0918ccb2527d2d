//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Application identity
pub mod app {
    /// Name shown in notifications and the tray tooltip
    pub const NAME: &str = "Wallpaper Watch";
}

/// Win32 system color constants
pub mod sys_color {
    /// System color index of the desktop background (`COLOR_DESKTOP`)
    pub const COLOR_DESKTOP: i32 = 1;

    /// Mask of the channel bytes in a packed color (byte 3 is unused)
    pub const CHANNEL_MASK: u32 = 0x00FF_FFFF;
}

/// Reconciliation schedule
pub mod schedule {
    /// Default seconds between two reconciliation ticks
    pub const DEFAULT_INTERVAL_SECS: u64 = 5;

    pub const MIN_INTERVAL_SECS: u64 = 1;
    pub const MAX_INTERVAL_SECS: u64 = 3600;
}

/// Configuration file locations
pub mod config {
    /// Configuration file name, looked up in the working directory first
    pub const FILENAME: &str = "config.json";

    /// Directory under the platform config dir used as fallback
    pub const APP_DIR: &str = "wallpaper-watch";
}

/// Tray icon resource
pub mod icon {
    /// Icon file read at startup, relative to the working directory
    pub const FILENAME: &str = "icon.ico";
}

/// Tray menu labels
pub mod menu {
    pub const EDIT_CONFIG: &str = "Edit configuration";
    pub const QUIT: &str = "Quit";
}

/// Notification texts
pub mod messages {
    pub const SUCCESS: &str = "Desktop background color restored!";
    pub const FAILURE: &str = "Failed to set the desktop background color!";
    pub const ERR_CONFIG: &str = "Failed to load the configuration!";
    pub const ERR_ICON: &str = "Failed to load the tray icon!";
    pub const ERR_COLOR: &str = "Invalid color code in configuration file!";
}
