// SmartClip - Surveillance du presse-papiers
// Un poller par type de contenu, chacun produisant son propre flux.
//
// Le presse-papiers est lu a intervalle fixe sur un thread bloquant.
// La valeur presente au demarrage est lue avant le retour de
// `spawn_poller` : elle sert de reference et n'est pas emise, et toute
// copie faite apres le retour sera vue comme un changement. Ensuite,
// seule une valeur non vide differente de la lecture precedente est
// envoyee au watcher. Une absence de contenu (`None`)
// compte comme une lecture : recopier la meme valeur apres un contenu
// d'un autre type produit donc une nouvelle emission.
//
// Les erreurs de lecture (presse-papiers occupe par une autre
// application) sont frequentes et sans gravite : elles sont
// journalisees en debug et la lecture precedente est conservee.
//
// Le poller s'arrete sur le signal d'arret ou quand le watcher a
// detruit son recepteur.

use crate::clipboard::port::ClipboardPort;
use crate::constants::OBSERVATION_QUEUE_DEPTH;
use crate::history::entry::EntryKind;
use crate::lifecycle::StopListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

fn log_read_error(kind: EntryKind, e: &dyn std::fmt::Display) {
    debug!(kind = kind.as_str(), error = %e, "clipboard read failed");
}

async fn read_once(port: &Arc<dyn ClipboardPort>, kind: EntryKind) -> Option<Option<Vec<u8>>> {
    let port = Arc::clone(port);
    match tokio::task::spawn_blocking(move || port.read(kind)).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            log_read_error(kind, &e);
            None
        }
        Err(e) => {
            log_read_error(kind, &e);
            None
        }
    }
}

/// Demarre le poller d'un type de contenu.
///
/// La lecture de reference est faite sur le thread appelant.
pub fn spawn_poller(
    port: Arc<dyn ClipboardPort>,
    kind: EntryKind,
    interval: Duration,
    mut stop: StopListener,
) -> (mpsc::Receiver<Vec<u8>>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(OBSERVATION_QUEUE_DEPTH);
    let mut previous = port.read(kind).unwrap_or_else(|e| {
        log_read_error(kind, &e);
        None
    });
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = stop.stopped() => break,
                _ = ticker.tick() => {}
            }
            let Some(current) = read_once(&port, kind).await else {
                continue;
            };
            if current == previous {
                continue;
            }
            previous = current.clone();
            let Some(payload) = current.filter(|p| !p.is_empty()) else {
                continue;
            };
            tokio::select! {
                _ = stop.stopped() => break,
                sent = tx.send(payload) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
        debug!(kind = kind.as_str(), "clipboard poller stopped");
    });
    (rx, handle)
}
