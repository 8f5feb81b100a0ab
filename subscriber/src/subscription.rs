use crate::connection::{Connection, ReconnectPolicy};
use crate::diagnostics::Diagnostics;
use crate::display::DisplaySink;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::renderer::{Renderer, SubscriptionState};
use log::*;

/// An owned connection paired with the renderer that consumes it.
pub struct Subscriber<D: DisplaySink, G: Diagnostics> {
    connection: Connection,
    renderer: Renderer<D, G>,
}

impl<D: DisplaySink, G: Diagnostics> Subscriber<D, G> {
    /// Opens the subscription. The state starts as connected: the transport begins
    /// connecting immediately and reports failures through the event stream.
    pub async fn start(
        endpoint: Endpoint,
        policy: &ReconnectPolicy,
        renderer: Renderer<D, G>,
    ) -> Result<Self, Error> {
        let connection = Connection::establish(endpoint, policy).await?;
        Ok(Self {
            connection,
            renderer,
        })
    }

    /// Waits for one notification and renders it. Returns `false` once the
    /// transport has ended and no further events will arrive.
    pub async fn next(&mut self) -> bool {
        match self.connection.recv().await {
            Some(event) => {
                self.renderer.handle(event);
                true
            }
            None => false,
        }
    }

    /// Renders notifications until the transport ends.
    pub async fn run(&mut self) {
        while self.next().await {}
        debug!(
            "No more events from {} ({})",
            self.connection.endpoint(),
            self.renderer.state()
        );
    }

    pub fn state(&self) -> SubscriptionState {
        self.renderer.state()
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.connection.endpoint()
    }

    pub fn renderer(&self) -> &Renderer<D, G> {
        &self.renderer
    }

    /// Tears down the connection and hands back the renderer with everything it displayed.
    pub fn close(self) -> Renderer<D, G> {
        self.connection.close();
        self.renderer
    }
}

#[cfg(test)]
impl<D: DisplaySink, G: Diagnostics> Subscriber<D, G> {
    pub(crate) fn from_connection(connection: Connection, renderer: Renderer<D, G>) -> Self {
        Self {
            connection,
            renderer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogDiagnostics;
    use crate::display::DisplayList;
    use crate::event::{StreamEvent, TransportError};
    use tokio::sync::mpsc;

    fn subscriber_with(
        events: Vec<StreamEvent>,
    ) -> Subscriber<DisplayList, LogDiagnostics> {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            tx.send(event).unwrap();
        }
        let connection = Connection::from_receiver(Endpoint::default(), rx);
        Subscriber::from_connection(connection, Renderer::new(DisplayList::new()))
    }

    #[tokio::test]
    async fn test_run_renders_until_transport_ends() {
        let mut subscriber = subscriber_with(vec![
            StreamEvent::Message("x".to_string()),
            StreamEvent::Error(TransportError::new("dropped")),
            StreamEvent::Message("y".to_string()),
        ]);

        subscriber.run().await;

        assert_eq!(
            subscriber.renderer().display().entries(),
            ["message: x", "message: y"]
        );
        assert_eq!(subscriber.state(), SubscriptionState::Connected);
    }

    #[tokio::test]
    async fn test_next_reports_end_of_stream() {
        let mut subscriber = subscriber_with(vec![StreamEvent::Error(TransportError::new(
            "refused",
        ))]);

        assert!(subscriber.next().await);
        assert_eq!(subscriber.state(), SubscriptionState::Erroring);
        assert!(!subscriber.next().await);
        assert!(subscriber.renderer().display().is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_is_fixed_for_the_lifetime_of_the_subscription() {
        let mut subscriber = subscriber_with(vec![StreamEvent::Message("a".to_string())]);
        let endpoint = subscriber.endpoint().clone();

        subscriber.run().await;

        assert_eq!(subscriber.endpoint(), &endpoint);
        assert_eq!(endpoint.as_str(), crate::endpoint::EVENTS_URL);
    }

    #[tokio::test]
    async fn test_close_returns_rendered_entries() {
        let mut subscriber = subscriber_with(vec![StreamEvent::Message("hello".to_string())]);
        subscriber.run().await;

        let renderer = subscriber.close();

        assert_eq!(renderer.display().entries(), ["message: hello"]);
    }
}
