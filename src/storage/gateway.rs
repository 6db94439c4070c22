// SmartClip - Passerelle de persistance
// File d'ecriture unique pour config.json et history.json
//
// Les mutations postent un instantane versionne du document concerne
// (`save_history`, `save_config`) sans attendre : l'appel ne bloque
// jamais et n'echoue jamais du point de vue de l'appelant.
//
// Une seule tache ecrivain consomme la file :
// - elle draine tous les messages en attente,
// - ne garde que l'instantane de plus haute version pour chaque document,
// - ignore un instantane plus ancien que le dernier ecrit,
// - ecrit sur un thread bloquant (fichier temporaire + rename).
// Deux sauvegardes ne s'entrelacent donc jamais sur le meme fichier.
//
// Les erreurs d'ecriture sont journalisees puis oubliees (pas de
// nouvelle tentative). Une mutation en memoire peut etre perdue si le
// processus s'arrete avant l'ecriture : l'historique est regenerable a
// partir du presse-papiers, ce n'est pas un etat de reference.
//
// `flush` attend que tout ce qui a ete poste avant l'appel soit ecrit ;
// il est utilise a l'arret et dans les tests.

use crate::config::settings::Config;
use crate::history::entry::ClipboardEntry;
use crate::storage::files::{self, DataPaths};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Message poste a l'ecrivain.
enum SaveRequest {
    History(u64, Vec<ClipboardEntry>),
    Config(u64, Config),
    Flush(oneshot::Sender<()>),
}

/// Poignee de sauvegarde partagee par les stores.
#[derive(Clone)]
pub struct PersistenceGateway {
    tx: Option<mpsc::UnboundedSender<SaveRequest>>,
}

impl PersistenceGateway {
    /// Passerelle sans ecrivain : toutes les sauvegardes sont ignorees.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Demarre la tache ecrivain. Doit etre appele dans un runtime tokio.
    /// La tache se termine quand toutes les poignees sont detruites.
    pub fn spawn(paths: DataPaths) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(writer_loop(paths, rx));
        (Self { tx: Some(tx) }, handle)
    }

    /// Charge les deux documents, chacun independamment et sans erreur.
    pub fn load(paths: &DataPaths) -> (Config, Vec<ClipboardEntry>) {
        (files::load_config(paths), files::load_history(paths))
    }

    fn post(&self, request: SaveRequest) {
        if let Some(tx) = &self.tx {
            if tx.send(request).is_err() {
                warn!("persistence writer stopped, dropping save request");
            }
        }
    }

    /// Poste une sauvegarde de l'historique.
    pub fn save_history(&self, version: u64, entries: Vec<ClipboardEntry>) {
        self.post(SaveRequest::History(version, entries));
    }

    /// Poste une sauvegarde de la configuration.
    pub fn save_config(&self, version: u64, config: Config) {
        self.post(SaveRequest::Config(version, config));
    }

    /// Attend l'ecriture de toutes les sauvegardes postees avant l'appel.
    pub async fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if tx.send(SaveRequest::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

/// Sauvegardes en attente, reduites a la derniere version par document.
#[derive(Default)]
struct Pending {
    history: Option<(u64, Vec<ClipboardEntry>)>,
    config: Option<(u64, Config)>,
    waiters: Vec<oneshot::Sender<()>>,
}

impl Pending {
    fn absorb(&mut self, request: SaveRequest) {
        match request {
            SaveRequest::History(v, entries) => {
                if self.history.as_ref().map_or(true, |(cur, _)| v > *cur) {
                    self.history = Some((v, entries));
                }
            }
            SaveRequest::Config(v, config) => {
                if self.config.as_ref().map_or(true, |(cur, _)| v > *cur) {
                    self.config = Some((v, config));
                }
            }
            SaveRequest::Flush(done) => self.waiters.push(done),
        }
    }
}

async fn writer_loop(paths: DataPaths, mut rx: mpsc::UnboundedReceiver<SaveRequest>) {
    let mut written_history = 0u64;
    let mut written_config = 0u64;

    while let Some(first) = rx.recv().await {
        let mut pending = Pending::default();
        pending.absorb(first);
        while let Ok(next) = rx.try_recv() {
            pending.absorb(next);
        }

        if let Some((version, entries)) = pending.history {
            if version > written_history {
                let p = paths.clone();
                let count = entries.len();
                match tokio::task::spawn_blocking(move || files::save_history(&p, &entries)).await {
                    Ok(Ok(())) => {
                        written_history = version;
                        debug!(version, count, "history saved");
                    }
                    Ok(Err(e)) => warn!(version, error = %e, "failed to save history"),
                    Err(e) => warn!(version, error = %e, "history save task failed"),
                }
            }
        }

        if let Some((version, config)) = pending.config {
            if version > written_config {
                let p = paths.clone();
                match tokio::task::spawn_blocking(move || files::save_config(&p, &config)).await {
                    Ok(Ok(())) => {
                        written_config = version;
                        debug!(version, "config saved");
                    }
                    Ok(Err(e)) => warn!(version, error = %e, "failed to save config"),
                    Err(e) => warn!(version, error = %e, "config save task failed"),
                }
            }
        }

        for done in pending.waiters {
            let _ = done.send(());
        }
    }
    debug!("persistence writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::EntryKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_flush() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path());
        let (gateway, _writer) = PersistenceGateway::spawn(paths.clone());

        let entries = vec![ClipboardEntry::new(EntryKind::Text, "hello")];
        gateway.save_history(1, entries.clone());
        gateway.save_config(1, Config { max_history: 12, ..Config::default() });
        gateway.flush().await;

        let (config, history) = PersistenceGateway::load(&paths);
        assert_eq!(config.max_history, 12);
        assert_eq!(history, entries);
    }

    #[tokio::test]
    async fn test_older_version_never_overwrites_newer() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path());
        let (gateway, _writer) = PersistenceGateway::spawn(paths.clone());

        let newer = vec![
            ClipboardEntry::new(EntryKind::Text, "b"),
            ClipboardEntry::new(EntryKind::Text, "a"),
        ];
        let older = vec![ClipboardEntry::new(EntryKind::Text, "a")];
        gateway.save_history(2, newer.clone());
        gateway.flush().await;
        gateway.save_history(1, older);
        gateway.flush().await;

        assert_eq!(files::load_history(&paths), newer);
    }

    #[tokio::test]
    async fn test_write_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        // Un fichier a la place du repertoire rend toute ecriture impossible.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();
        let (gateway, _writer) = PersistenceGateway::spawn(DataPaths::new(&blocker));

        gateway.save_config(1, Config::default());
        gateway.flush().await;
        gateway.save_config(2, Config::default());
        gateway.flush().await;
        assert!(blocker.is_file());
    }

    #[tokio::test]
    async fn test_disabled_gateway_is_noop() {
        let gateway = PersistenceGateway::disabled();
        gateway.save_history(1, Vec::new());
        gateway.flush().await;
    }
}
