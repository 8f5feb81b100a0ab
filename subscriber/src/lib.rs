//! Live, append-only view of a server-sent-events stream.
//!
//! A [`Subscriber`] owns one [`Connection`] to a fixed endpoint and one
//! [`Renderer`]. The connection's background task turns transport output into
//! [`StreamEvent`]s and queues them on a channel; the subscriber consumes that
//! channel on a single task, so entries appear in exactly the order the
//! transport delivered them.
//!
//! # Message flow
//!
//! 1. `Subscriber::start` opens the stream (initially in the connected state)
//! 2. Each default-typed SSE event becomes `StreamEvent::Message(payload)`
//! 3. The renderer appends `"message: " + payload` to its display sink
//! 4. Transport failures become `StreamEvent::Error` and are written to the
//!    diagnostics sink as `EventSource failed: <error>`; the display is untouched
//! 5. Reconnecting after a failure is left to the transport, per [`ReconnectPolicy`]
//!
//! # Modules
//!
//! - `connection`: the SSE client task and reconnection policy
//! - `display`: entry rendering, the in-memory list and the terminal sink
//! - `diagnostics`: where transport failures are reported
//! - `renderer`: event handling and connection state
//! - `subscription`: the owned connection + renderer pair

pub mod connection;
pub mod diagnostics;
pub mod display;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod renderer;
pub mod subscription;

pub use connection::{Connection, ReconnectPolicy};
pub use display::{DisplayList, DisplaySink, TerminalDisplay};
pub use endpoint::{Endpoint, EVENTS_URL};
pub use event::{StreamEvent, TransportError};
pub use renderer::{Renderer, SubscriptionState};
pub use subscription::Subscriber;
