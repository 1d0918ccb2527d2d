//! User-facing notifications
//!
//! Notifications are diagnostic only: delivery is best effort and a failed
//! toast never affects the reconciliation loop.

use notify_rust::Notification;
use tracing::{debug, error, info, warn};

use crate::constants::{app, messages};

/// Every message the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Failure,
    ConfigLoadError,
    IconLoadError,
    InvalidColorFormat,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Success => messages::SUCCESS,
            Notice::Failure => messages::FAILURE,
            Notice::ConfigLoadError => messages::ERR_CONFIG,
            Notice::IconLoadError => messages::ERR_ICON,
            Notice::InvalidColorFormat => messages::ERR_COLOR,
        }
    }

    /// Notices raised by reconciliation ticks, as opposed to startup
    pub fn is_runtime(self) -> bool {
        matches!(self, Notice::Success | Notice::Failure)
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Shows notices as desktop toasts
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success => info!(notice = ?notice, "{}", notice.message()),
            Notice::IconLoadError => warn!(notice = ?notice, "{}", notice.message()),
            _ => error!(notice = ?notice, "{}", notice.message()),
        }

        if let Err(err) = Notification::new()
            .appname(app::NAME)
            .summary(app::NAME)
            .body(notice.message())
            .show()
        {
            debug!(error = %err, "notification delivery failed");
        }
    }
}
