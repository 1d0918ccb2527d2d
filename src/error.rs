use thiserror::Error;

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::notify::Notice;

/// Failures that stop the process before the first tick
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    ConfigLoad(#[from] ConfigError),

    #[error(transparent)]
    InvalidColorFormat(#[from] ColorError),
}

impl StartupError {
    pub fn notice(&self) -> Notice {
        match self {
            StartupError::ConfigLoad(_) => Notice::ConfigLoadError,
            StartupError::InvalidColorFormat(_) => Notice::InvalidColorFormat,
        }
    }

    /// Process exit status; every startup failure exits with 1
    pub fn exit_status(&self) -> u8 {
        1
    }
}
