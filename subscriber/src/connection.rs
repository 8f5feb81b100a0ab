use crate::endpoint::Endpoint;
use crate::error::{Error, SubscriberErrorKind};
use crate::event::{StreamEvent, TransportError};
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use std::time::Duration;
use tokio::sync::mpsc;

/// SSE event type delivered to message handlers when the server names none.
const DEFAULT_EVENT_TYPE: &str = "message";

/// What happens after the stream fails. Every failure is still delivered as a
/// `StreamEvent::Error` before the policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconnectPolicy {
    /// Give up after the first failure. The event stream ends and `recv` returns `None`.
    Disabled,
    /// Retry with exponential backoff, starting at `delay` and capped at `delay_max`.
    Backoff {
        delay: Duration,
        delay_max: Duration,
        backoff_factor: u32,
    },
}

impl ReconnectPolicy {
    fn retry(&self) -> Retry {
        Retry {
            policy: self.clone(),
            next_delay: match self {
                ReconnectPolicy::Disabled => Duration::ZERO,
                ReconnectPolicy::Backoff { delay, .. } => *delay,
            },
        }
    }
}

/// Pacing state for one connection. The SSE client's built-in reconnection
/// retries immediately after refused connections and non-2xx responses, so the
/// forwarding task decides when (and whether) the client is polled again.
struct Retry {
    policy: ReconnectPolicy,
    next_delay: Duration,
}

impl Retry {
    /// Delay to wait before polling the transport again, or `None` to give up.
    fn after_failure(&mut self) -> Option<Duration> {
        match &self.policy {
            ReconnectPolicy::Disabled => None,
            ReconnectPolicy::Backoff {
                delay_max,
                backoff_factor,
                ..
            } => {
                let wait = self.next_delay;
                self.next_delay = wait
                    .checked_mul(*backoff_factor)
                    .map_or(*delay_max, |next| next.min(*delay_max));
                Some(wait)
            }
        }
    }

    /// The stream is delivering again; start over from the initial delay.
    fn reset(&mut self) {
        if let ReconnectPolicy::Backoff { delay, .. } = &self.policy {
            self.next_delay = *delay;
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::Backoff {
            delay: Duration::from_secs(3),
            delay_max: Duration::from_secs(60),
            backoff_factor: 2,
        }
    }
}

/// The one live subscription to an event stream.
///
/// A background task drives the SSE client and forwards every notification into a
/// channel, so events are consumed in exactly the order the transport produced them.
/// The task is aborted when the connection is closed or dropped.
pub struct Connection {
    endpoint: Endpoint,
    event_rx: mpsc::UnboundedReceiver<StreamEvent>,
    handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    pub async fn establish(endpoint: Endpoint, policy: &ReconnectPolicy) -> Result<Self, Error> {
        let (tx, rx) = mpsc::unbounded_channel();

        let client = es::ClientBuilder::for_url(endpoint.as_str())
            .map_err(|e| Error::with_source(SubscriberErrorKind::InvalidEndpoint, e.to_string()))?
            .reconnect(es::ReconnectOptions::reconnect(false).build())
            .build();

        let url = endpoint.clone();
        let mut retry = policy.retry();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                let (event, wait) = match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => {
                        retry.reset();
                        if !is_message_type(&event.event_type) {
                            debug!("Ignoring '{}' event from {}", event.event_type, url);
                            continue;
                        }
                        (StreamEvent::Message(event.data), None)
                    }
                    Some(Ok(es::SSE::Comment(_))) => {
                        // Keep-alive
                        retry.reset();
                        continue;
                    }
                    Some(Err(e)) => {
                        let event = StreamEvent::Error(TransportError::new(e.to_string()));
                        match retry.after_failure() {
                            Some(wait) => (event, Some(wait)),
                            None => {
                                let _ = tx.send(event);
                                debug!("Reconnection disabled, closing event stream for {}", url);
                                break;
                            }
                        }
                    }
                    None => {
                        debug!("Event stream ended for {}", url);
                        break;
                    }
                };

                if tx.send(event).is_err() {
                    debug!("Event receiver dropped for {}", url);
                    break;
                }

                if let Some(wait) = wait {
                    debug!("Reconnecting to {} in {:?}", url, wait);
                    tokio::time::sleep(wait).await;
                }
            }
        });

        info!("Subscribed to event stream at {}", endpoint);

        Ok(Self {
            endpoint,
            event_rx: rx,
            handle,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_receiver(
        endpoint: Endpoint,
        event_rx: mpsc::UnboundedReceiver<StreamEvent>,
    ) -> Self {
        Self {
            endpoint,
            event_rx,
            handle: tokio::spawn(async {}),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Waits for the next notification. `None` once the transport has given up.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.event_rx.recv().await
    }

    pub fn close(self) {
        info!("Closing event stream at {}", self.endpoint);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn is_message_type(event_type: &str) -> bool {
    event_type.is_empty() || event_type == DEFAULT_EVENT_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_unnamed_events_are_messages() {
        assert!(is_message_type("message"));
        assert!(is_message_type(""));
    }

    #[test]
    fn test_named_events_are_not_messages() {
        assert!(!is_message_type("ping"));
        assert!(!is_message_type("Message"));
    }

    #[test]
    fn test_disabled_policy_gives_up_after_first_failure() {
        let mut retry = ReconnectPolicy::Disabled.retry();

        assert_eq!(retry.after_failure(), None);
    }

    #[test]
    fn test_backoff_grows_until_capped() {
        let mut retry = ReconnectPolicy::Backoff {
            delay: Duration::from_millis(100),
            delay_max: Duration::from_millis(500),
            backoff_factor: 2,
        }
        .retry();

        let waits: Vec<_> = (0..5).filter_map(|_| retry.after_failure()).collect();

        assert_eq!(
            waits,
            [100, 200, 400, 500, 500].map(Duration::from_millis)
        );
    }

    #[test]
    fn test_backoff_resets_once_events_flow_again() {
        let mut retry = ReconnectPolicy::default().retry();
        retry.after_failure();
        retry.after_failure();

        retry.reset();

        assert_eq!(retry.after_failure(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_backoff_factor_overflow_saturates_at_max() {
        let mut retry = ReconnectPolicy::Backoff {
            delay: Duration::from_secs(u64::MAX / 2),
            delay_max: Duration::from_secs(60),
            backoff_factor: u32::MAX,
        }
        .retry();

        retry.after_failure();

        assert_eq!(retry.after_failure(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_default_policy_reconnects_with_backoff() {
        assert_eq!(
            ReconnectPolicy::default(),
            ReconnectPolicy::Backoff {
                delay: Duration::from_secs(3),
                delay_max: Duration::from_secs(60),
                backoff_factor: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_establish_rejects_malformed_url() {
        let result = Connection::establish(Endpoint::new("not a url"), &ReconnectPolicy::Disabled).await;

        match result {
            Err(e) => assert_eq!(e.error_kind, SubscriberErrorKind::InvalidEndpoint),
            Ok(_) => panic!("malformed endpoint should be rejected"),
        }
    }

    #[tokio::test]
    async fn test_closed_channel_ends_the_connection() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut connection = Connection::from_receiver(Endpoint::default(), rx);
        tx.send(StreamEvent::Message("last".to_string())).unwrap();
        drop(tx);

        assert_eq!(
            connection.recv().await,
            Some(StreamEvent::Message("last".to_string()))
        );
        assert_eq!(connection.recv().await, None);
    }
}
