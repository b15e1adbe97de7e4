//! Stage progress events.
//!
//! The pipeline emits events via [`EventBus::emit`]; the CLI subscribes via
//! [`EventBus::subscribe`] to print stage banners and drive the spinner.
//! Built on [`tokio::sync::broadcast`] so emitting never blocks a run.

use tokio::sync::broadcast;

use crate::pipeline::Stage;

/// Events that flow out of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A stage began.
    StageStarted { stage: Stage },
    /// A stage finished; `detail` is a short human-readable summary.
    StageCompleted { stage: Stage, detail: String },
    /// A stage failed and the run is over.
    Failed { stage: Stage, reason: String },
}

/// A broadcast channel that any component can emit to or subscribe from.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events. Returns a receiver that yields all
    /// future events (does not replay past ones).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_reaches_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(Event::StageStarted {
            stage: Stage::GenerateQuote,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            Event::StageStarted {
                stage: Stage::GenerateQuote
            }
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(Event::Failed {
            stage: Stage::CreateMedia,
            reason: "400".to_string(),
        });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1, e2);
    }

    #[test]
    fn emit_without_subscribers_returns_zero() {
        let bus = EventBus::default();
        let count = bus.emit(Event::StageStarted {
            stage: Stage::RenderImage,
        });
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn receiver_closes_when_bus_dropped() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        drop(bus);
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
