use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::info;

use crate::reconciler::Event;

/// Turn SIGINT/SIGTERM into [`Event::Quit`]
///
/// Without a tray there is no menu, so signals are the only way to stop.
pub fn spawn(events: Sender<Event>) -> Result<JoinHandle<()>> {
    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;
    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                info!(signal, "Termination signal received");
                if events.send(Event::Quit).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn signal thread")
}
