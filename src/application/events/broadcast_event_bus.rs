use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::event_bus::EventBus;
use crate::events::Event;
use crate::infrastructure::logging::BoundaryLogger;

#[derive(Clone)]
pub struct BroadcastEventBus {
    tx: broadcast::Sender<Event>,
    logger: Arc<BoundaryLogger>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize, logger: Arc<BoundaryLogger>) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx, logger }
    }

    /// Events are rare (refreshes, theme flips); a small buffer is plenty.
    pub fn new_default(logger: Arc<BoundaryLogger>) -> Self {
        Self::new(64, logger)
    }
}

#[async_trait]
impl EventBus for BroadcastEventBus {
    async fn emit(&self, event: Event) {
        self.logger.event_emit("App", event.kind());

        // No subscribers is fine
        let _ = self.tx.send(event);
    }

    fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::settings_service::Theme;

    #[tokio::test]
    async fn test_emit_reaches_subscriber() {
        let bus = BroadcastEventBus::new_default(Arc::new(BoundaryLogger::new()));
        let mut rx = bus.subscribe();

        bus.emit(Event::theme_changed(Theme::Light)).await;

        match rx.recv().await.unwrap() {
            Event::ThemeChanged { theme, .. } => assert_eq!(theme, Theme::Light),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = BroadcastEventBus::new_default(Arc::new(BoundaryLogger::new()));
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(Event::repositories_refreshed(3, None)).await;

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_emit_without_subscribers() {
        let bus = BroadcastEventBus::new_default(Arc::new(BoundaryLogger::new()));
        bus.emit(Event::repositories_refreshed(0, None)).await;
    }
}
