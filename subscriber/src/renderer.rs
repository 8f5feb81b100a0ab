use crate::diagnostics::{Diagnostics, LogDiagnostics, TRANSPORT_FAILURE_LABEL};
use crate::display::{render_entry, DisplaySink};
use crate::event::StreamEvent;
use log::*;
use std::fmt;

/// Whether the last notification seen from the transport was a message or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Connected,
    Erroring,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionState::Connected => write!(f, "connected"),
            SubscriptionState::Erroring => write!(f, "erroring"),
        }
    }
}

/// Turns stream events into display entries and diagnostic records.
///
/// Each event kind has exactly one handler. Messages are appended to the display
/// as `"message: " + payload`; transport errors are recorded once and never touch
/// the display.
pub struct Renderer<D: DisplaySink, G: Diagnostics = LogDiagnostics> {
    display: D,
    diagnostics: G,
    state: SubscriptionState,
}

impl<D: DisplaySink> Renderer<D, LogDiagnostics> {
    pub fn new(display: D) -> Self {
        Self::with_diagnostics(display, LogDiagnostics)
    }
}

impl<D: DisplaySink, G: Diagnostics> Renderer<D, G> {
    pub fn with_diagnostics(display: D, diagnostics: G) -> Self {
        Self {
            display,
            diagnostics,
            state: SubscriptionState::Connected,
        }
    }

    pub fn handle(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Message(payload) => {
                self.transition(SubscriptionState::Connected);
                if let Err(e) = self.display.append(render_entry(&payload)) {
                    warn!("{e}");
                }
            }
            StreamEvent::Error(err) => {
                self.transition(SubscriptionState::Erroring);
                self.diagnostics.record(TRANSPORT_FAILURE_LABEL, &err);
            }
        }
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn diagnostics(&self) -> &G {
        &self.diagnostics
    }

    fn transition(&mut self, next: SubscriptionState) {
        if self.state != next {
            info!("Event stream {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
