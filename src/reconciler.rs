//! The reconciliation loop
//!
//! A single consumer drains one event queue. A [`Event::Tick`] compares the
//! observed desktop color with the desired one and writes the desired color
//! back whenever they differ. Correction is level-triggered: every divergent
//! tick retries, there is no backoff.
//!
//! ```text
//! Idle --Tick--> Checking --equal--> Idle
//!                   |
//!                differs
//!                   v
//!               Correcting --accepted/rejected--> Reporting --> Idle
//! ```

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::Receiver;

use tracing::{debug, error, info, trace, warn};

use crate::color::SysColor;
use crate::comparator;
use crate::config::NotifyPolicy;
use crate::constants::sys_color::COLOR_DESKTOP;
use crate::editor::ConfigEditor;
use crate::notify::{Notice, Notifier};
use crate::sys_colors::{ColorSlot, SystemColors};

/// Everything the loop reacts to, in arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    OpenConfig,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Checking,
    Correcting,
    Reporting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Observed color already matched; nothing was written or shown
    InSync,
    Corrected,
    CorrectionFailed,
}

pub struct Reconciler<C, N> {
    desired: SysColor,
    slot: ColorSlot,
    colors: C,
    notifier: N,
    policy: NotifyPolicy,
    editor: Option<(Box<dyn ConfigEditor>, PathBuf)>,
    phase: Phase,
    /// Last runtime notice since the color was last in sync
    last_notice: Option<Notice>,
}

impl<C: SystemColors, N: Notifier> Reconciler<C, N> {
    /// Manage the desktop background slot
    pub fn new(desired: SysColor, colors: C, notifier: N) -> Self {
        Self {
            desired,
            slot: COLOR_DESKTOP,
            colors,
            notifier,
            policy: NotifyPolicy::default(),
            editor: None,
            phase: Phase::Idle,
            last_notice: None,
        }
    }

    #[cfg(test)]
    pub fn with_slot(mut self, slot: ColorSlot) -> Self {
        self.slot = slot;
        self
    }

    pub fn with_policy(mut self, policy: NotifyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Editor used for [`Event::OpenConfig`]
    pub fn with_editor(
        mut self,
        editor: impl ConfigEditor + 'static,
        config_path: PathBuf,
    ) -> Self {
        self.editor = Some((Box::new(editor), config_path));
        self
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn colors(&self) -> &C {
        &self.colors
    }

    #[cfg(test)]
    pub fn colors_mut(&mut self) -> &mut C {
        &mut self.colors
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Run one check-and-correct cycle
    pub fn tick(&mut self) -> TickOutcome {
        self.enter(Phase::Checking);
        let observed = comparator::read_current(&self.colors, self.slot);

        if !comparator::differs(observed, self.desired) {
            debug!(color = %observed, "desktop color in sync");
            self.last_notice = None;
            self.enter(Phase::Idle);
            return TickOutcome::InSync;
        }

        info!(
            observed = %observed,
            desired = %self.desired,
            slot = self.slot,
            "desktop color diverged, correcting"
        );
        self.enter(Phase::Correcting);
        let accepted = self.colors.set(&[(self.slot, self.desired)]);

        self.enter(Phase::Reporting);
        let outcome = if accepted {
            self.report(Notice::Success);
            TickOutcome::Corrected
        } else {
            self.report(Notice::Failure);
            TickOutcome::CorrectionFailed
        };

        self.enter(Phase::Idle);
        outcome
    }

    fn report(&mut self, notice: Notice) {
        let repeated = notice.is_runtime() && self.last_notice == Some(notice);
        if notice.is_runtime() {
            self.last_notice = Some(notice);
        }

        if repeated && self.policy == NotifyPolicy::OnChange {
            debug!(notice = ?notice, "same outcome as last tick, notification suppressed");
            return;
        }
        self.notifier.notify(notice);
    }

    /// Process one event; `Break` means the loop should end
    pub fn handle(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::Tick => {
                self.tick();
            }
            Event::OpenConfig => match &self.editor {
                Some((editor, path)) => {
                    if let Err(err) = editor.open(path) {
                        error!(error = ?err, "Failed to open configuration");
                    }
                }
                None => warn!("no editor configured, ignoring request"),
            },
            Event::Quit => {
                info!("Quit requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Drain `events` one at a time until quit
    pub fn run(&mut self, events: &Receiver<Event>) -> ExitCode {
        info!(
            desired = %self.desired,
            slot = self.slot,
            policy = ?self.policy,
            "Reconciler running"
        );
        for event in events.iter() {
            trace!(event = ?event, "event received");
            if self.handle(event).is_break() {
                return ExitCode::SUCCESS;
            }
        }
        warn!("all event sources closed, exiting");
        ExitCode::SUCCESS
    }
}
