use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::reconciler::Event;

/// Spawn a thread that enqueues [`Event::Tick`] every `interval`
///
/// Ticks follow fixed deadlines (`start + n * interval`), so the time the
/// consumer spends on a tick does not shift the schedule. After a long stall
/// (e.g. system sleep) the schedule restarts from now instead of bursting.
/// The thread ends once the receiving side is gone.
pub fn spawn(interval: Duration, events: Sender<Event>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("ticker".to_string())
        .spawn(move || {
            info!(interval = ?interval, "Ticker started");
            let mut next = Instant::now() + interval;
            loop {
                let now = Instant::now();
                if next > now {
                    thread::sleep(next - now);
                }

                if events.send(Event::Tick).is_err() {
                    debug!("event queue closed, ticker stopping");
                    break;
                }

                next += interval;
                let now = Instant::now();
                if now > next + interval {
                    debug!(behind = ?(now - next), "ticker fell behind, rescheduling");
                    next = now + interval;
                }
            }
        })
        .context("Failed to spawn ticker thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_ticks_arrive_repeatedly() {
        let (tx, rx) = mpsc::channel();
        let _handle = spawn(Duration::from_millis(10), tx).unwrap();

        for _ in 0..3 {
            let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(event, Event::Tick);
        }
    }

    #[test]
    fn test_first_tick_waits_one_interval() {
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        let _handle = spawn(Duration::from_millis(50), tx).unwrap();

        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn(Duration::from_millis(5), tx).unwrap();
        drop(rx);
        handle.join().unwrap();
    }
}
