// SmartClip - Notifications vers la couche de presentation
//
// Le moteur ne connait pas l'interface : il diffuse des `EngineEvent`
// sur un canal `tokio::sync::broadcast`. Chaque abonne (fenetre, logs,
// tests) recoit sa propre copie. L'emission ne bloque jamais et reussit
// meme sans abonne.
//
// Les noms d'evenements (`historyUpdated`, `clipboardError`) sont ceux
// attendus par le frontal.

use crate::constants::EVENT_CHANNEL_DEPTH;
use tokio::sync::broadcast;
use tracing::trace;

/// Evenement diffuse a la couche de presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// L'historique a change, la liste doit etre relue.
    HistoryUpdated,
    /// Une copie a ete refusee (message lisible).
    ClipboardError(String),
}

impl EngineEvent {
    /// Nom de l'evenement cote frontal.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HistoryUpdated => "historyUpdated",
            Self::ClipboardError(_) => "clipboardError",
        }
    }
}

/// Bus de diffusion des evenements.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CHANNEL_DEPTH);
        Self { tx }
    }

    pub fn emit(&self, event: EngineEvent) {
        trace!(event = event.name(), "emit");
        // Sans abonne, l'evenement est simplement perdu.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(EngineEvent::HistoryUpdated);
        bus.emit(EngineEvent::ClipboardError("too big".into()));
        assert_eq!(rx.recv().await.unwrap(), EngineEvent::HistoryUpdated);
        let e = rx.recv().await.unwrap();
        assert_eq!(e.name(), "clipboardError");
    }

    #[test]
    fn test_emit_without_subscriber() {
        EventBus::new().emit(EngineEvent::HistoryUpdated);
    }
}
