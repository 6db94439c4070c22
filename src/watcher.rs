// SmartClip - Boucle de surveillance
// Consommateur unique des flux texte et image produits par les pollers.
//
// Pour chaque valeur recue :
//   DedupGuard::admit -> (conversion) -> HistoryStore::insert -> historyUpdated
// La sauvegarde est postee par le store lui-meme apres l'insertion.
//
// Une image refusee par le plafond dur produit un `clipboardError`.
// Une image acceptee est encodee en data-URI et reduite au plafond
// souple sur un thread bloquant.
//
// La boucle ne s'interrompt qu'en attente d'une valeur et se termine
// sur le signal d'arret ou quand les deux flux sont fermes.

use crate::clipboard::codec::fit_data_uri;
use crate::clipboard::guard::{Admission, DedupGuard};
use crate::constants::IMAGE_SOFT_CAP_BYTES;
use crate::events::{EngineEvent, EventBus};
use crate::history::entry::EntryKind;
use crate::history::store::HistoryStore;
use crate::lifecycle::StopListener;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

type Stream = Option<mpsc::Receiver<Vec<u8>>>;

/// Boucle ClipboardPort -> historique.
pub struct ClipboardWatcher {
    guard: DedupGuard,
    history: Arc<HistoryStore>,
    events: EventBus,
    soft_cap: usize,
}

async fn next_value(stream: &mut Stream) -> Option<Vec<u8>> {
    match stream {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl ClipboardWatcher {
    pub fn new(guard: DedupGuard, history: Arc<HistoryStore>, events: EventBus) -> Self {
        Self {
            guard,
            history,
            events,
            soft_cap: IMAGE_SOFT_CAP_BYTES,
        }
    }

    /// Remplace le plafond souple des images.
    pub fn with_soft_cap(mut self, soft_cap: usize) -> Self {
        self.soft_cap = soft_cap;
        self
    }

    /// Consomme les deux flux jusqu'a l'arret.
    pub async fn run(
        mut self,
        text: mpsc::Receiver<Vec<u8>>,
        image: mpsc::Receiver<Vec<u8>>,
        mut stop: StopListener,
    ) {
        let mut text: Stream = Some(text);
        let mut image: Stream = Some(image);

        while text.is_some() || image.is_some() {
            tokio::select! {
                _ = stop.stopped() => break,
                value = next_value(&mut text) => match value {
                    Some(payload) => self.observe(EntryKind::Text, payload).await,
                    None => text = None,
                },
                value = next_value(&mut image) => match value {
                    Some(payload) => self.observe(EntryKind::Image, payload).await,
                    None => image = None,
                },
            }
        }
        debug!("clipboard watcher stopped");
    }

    async fn observe(&mut self, kind: EntryKind, payload: Vec<u8>) {
        match self.guard.admit(kind, &payload) {
            Admission::Skipped | Admission::Unchanged => {}
            Admission::Rejected(e) => {
                self.events.emit(EngineEvent::ClipboardError(e.to_string()));
            }
            Admission::Accepted => {
                let content = match kind {
                    EntryKind::Text => String::from_utf8_lossy(&payload).into_owned(),
                    EntryKind::Image => {
                        let cap = self.soft_cap;
                        match tokio::task::spawn_blocking(move || fit_data_uri(&payload, cap)).await {
                            Ok(uri) => uri,
                            Err(e) => {
                                warn!(error = %e, "image encoding task failed");
                                return;
                            }
                        }
                    }
                };
                self.history.insert(kind, content);
                self.events.emit(EngineEvent::HistoryUpdated);
            }
        }
    }
}
