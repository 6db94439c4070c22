// SmartClip - Orchestrateur principal
// Connecte tous les composants : presse-papiers, historique, tags,
// persistance, evenements.
//
// `Engine` est la facade exposee a la couche de presentation. Toutes
// ses operations sont synchrones, prennent `&self` et peuvent etre
// appelees depuis plusieurs threads a la fois.
//
// # Cycle de vie
// 1. `Engine::start()` : chargement des documents (best-effort),
//    reparation, demarrage de l'ecrivain, des pollers, du watcher et du
//    balayage. Doit etre appele dans un runtime tokio.
// 2. Appels d'API pendant toute la vie du processus.
// 3. `Engine::shutdown()` : signal d'arret, attente des taches,
//    ecriture des dernieres sauvegardes.
//
// # Taches
// - un poller par type de contenu (texte, image)
// - le watcher, consommateur des deux flux
// - le balayage de retention
// - l'ecrivain de la passerelle de persistance
//
// Sans presse-papiers (`port` absent), seuls le balayage et l'ecrivain
// tournent ; `save_to_clipboard` echoue alors avec `Clipboard`.

use crate::clipboard::guard::{DedupGuard, SkipNext};
use crate::clipboard::injector;
use crate::clipboard::monitor::spawn_poller;
use crate::clipboard::port::ClipboardPort;
use crate::config::settings::{Config, Tag};
use crate::config::store::ConfigStore;
use crate::config::tags::TagRegistry;
use crate::constants::{DEFAULT_POLL_INTERVAL, RETENTION_MAX_AGE, SWEEP_INTERVAL};
use crate::error::{ScError, ScResult};
use crate::events::{EngineEvent, EventBus};
use crate::history::entry::{ClipboardEntry, EntryKind};
use crate::history::store::HistoryStore;
use crate::lifecycle::{CloseDecision, ShutdownSignal, WindowLifecycle, WindowState};
use crate::storage::files::DataPaths;
use crate::storage::gateway::PersistenceGateway;
use crate::sweeper::RetentionSweeper;
use crate::watcher::ClipboardWatcher;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Options d'execution du moteur.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Repertoire de config.json et history.json
    pub data_dir: PathBuf,
    /// Periode de lecture du presse-papiers
    pub poll_interval: Duration,
    /// Periode du balayage de retention
    pub sweep_interval: Duration,
    /// Age au-dela duquel une entree est purgee
    pub retention: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new(DataPaths::user_default().dir())
    }
}

impl EngineOptions {
    /// Options par defaut avec un repertoire de donnees explicite.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            sweep_interval: SWEEP_INTERVAL,
            retention: RETENTION_MAX_AGE,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

/// Moteur d'historique du presse-papiers.
pub struct Engine {
    config: Arc<ConfigStore>,
    history: Arc<HistoryStore>,
    tags: TagRegistry,
    gateway: PersistenceGateway,
    events: EventBus,
    port: Option<Arc<dyn ClipboardPort>>,
    skip: SkipNext,
    window: Mutex<WindowLifecycle>,
    shutdown: ShutdownSignal,
    tasks: Vec<JoinHandle<()>>,
    writer: JoinHandle<()>,
}

impl Engine {
    /// Charge l'etat persiste et demarre les taches de fond.
    pub fn start(options: EngineOptions, port: Option<Arc<dyn ClipboardPort>>) -> Self {
        let paths = DataPaths::new(&options.data_dir);
        let (config, entries) = PersistenceGateway::load(&paths);
        let (gateway, writer) = PersistenceGateway::spawn(paths);

        let history = Arc::new(HistoryStore::new(config.max_history, entries, gateway.clone()));
        let cleared = history.clear_unknown_tags(&config.tag_ids());
        if cleared > 0 {
            warn!(cleared, "history entries referenced unknown tags");
        }
        info!(
            dir = %options.data_dir.display(),
            entries = history.len(),
            tags = config.tags.len(),
            max_history = config.max_history,
            "state loaded"
        );

        let config = Arc::new(ConfigStore::new(config, gateway.clone()));
        let tags = TagRegistry::new(config.clone(), history.clone());
        let events = EventBus::new();
        let skip = SkipNext::new();
        let shutdown = ShutdownSignal::new();
        let mut tasks = Vec::new();

        match &port {
            Some(port) => {
                let (text_rx, text_task) =
                    spawn_poller(port.clone(), EntryKind::Text, options.poll_interval, shutdown.subscribe());
                let (image_rx, image_task) =
                    spawn_poller(port.clone(), EntryKind::Image, options.poll_interval, shutdown.subscribe());
                let watcher = ClipboardWatcher::new(DedupGuard::new(skip.clone()), history.clone(), events.clone());
                tasks.push(text_task);
                tasks.push(image_task);
                tasks.push(tokio::spawn(watcher.run(text_rx, image_rx, shutdown.subscribe())));
            }
            None => warn!("no clipboard available, watching disabled"),
        }

        let sweeper = RetentionSweeper::new(
            history.clone(),
            events.clone(),
            options.sweep_interval,
            options.retention,
        );
        tasks.push(tokio::spawn(sweeper.run(shutdown.subscribe())));

        Self {
            config,
            history,
            tags,
            gateway,
            events,
            port,
            skip,
            window: Mutex::new(WindowLifecycle::new()),
            shutdown,
            tasks,
            writer,
        }
    }

    fn window(&self) -> MutexGuard<'_, WindowLifecycle> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Abonnement aux evenements `historyUpdated` / `clipboardError`.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    fn notify_history(&self) {
        self.events.emit(EngineEvent::HistoryUpdated);
    }

    // --- Historique ---

    /// Instantane de l'historique, plus recent en premier.
    pub fn get_history(&self) -> Vec<ClipboardEntry> {
        self.history.snapshot()
    }

    /// Remet un element dans le presse-papiers sans le reinserer.
    ///
    /// Avec `autoHide`, la fenetre est masquee apres l'ecriture.
    pub fn save_to_clipboard(&self, content: &str) -> ScResult<()> {
        let port = self
            .port
            .as_deref()
            .ok_or_else(|| ScError::Clipboard("clipboard unavailable".into()))?;
        injector::write_content(port, &self.skip, content)?;
        if self.config.read(|c| c.auto_hide) {
            self.window().hide();
        }
        Ok(())
    }

    pub fn delete_history_item(&self, id: &str) -> ScResult<()> {
        self.history.delete(id)?;
        self.notify_history();
        Ok(())
    }

    pub fn move_item_to_front(&self, id: &str) -> ScResult<()> {
        self.history.move_to_front(id)?;
        self.notify_history();
        Ok(())
    }

    /// Affecte un tag a un element. Un `tag_id` vide retire le tag.
    pub fn update_item_tag(&self, item_id: &str, tag_id: &str) -> ScResult<()> {
        self.tags.assign(item_id, tag_id)?;
        self.notify_history();
        Ok(())
    }

    // --- Tags ---

    pub fn tags(&self) -> Vec<Tag> {
        self.tags.tags()
    }

    pub fn add_tag(&self, name: &str, color: &str) -> ScResult<String> {
        self.tags.add_tag(name, color)
    }

    pub fn update_tag(&self, id: &str, name: &str, color: &str) -> ScResult<()> {
        self.tags.update_tag(id, name, color)
    }

    /// Supprime le tag et toutes les entrees qui le portent.
    pub fn delete_tag(&self, id: &str) -> ScResult<()> {
        let removed = self.tags.delete_tag(id)?;
        if removed > 0 {
            self.notify_history();
        }
        Ok(())
    }

    pub fn update_tags_order(&self, ids: &[String]) -> ScResult<()> {
        self.tags.reorder(ids)
    }

    // --- Configuration ---

    pub fn get_config(&self) -> Config {
        self.config.get()
    }

    /// # Errors
    /// `InvalidArgument` si `max_history` depasse 50.
    pub fn update_config(&self, max_history: usize, auto_hide: bool) -> ScResult<()> {
        let evicted = self.config.update(max_history, auto_hide, &self.history)?;
        if evicted > 0 {
            self.notify_history();
        }
        Ok(())
    }

    // --- Fenetre ---

    pub fn window_state(&self) -> WindowState {
        self.window().state()
    }

    /// Raccourci global : montre ou minimise la fenetre.
    pub fn toggle_window(&self) -> WindowState {
        self.window().toggle()
    }

    /// Bouton de fermeture. `Quit` signifie que l'appelant doit lancer
    /// `shutdown`.
    pub fn request_close(&self) -> CloseDecision {
        self.window().request_close()
    }

    // --- Arret ---

    /// Attend l'ecriture des sauvegardes postees jusqu'ici.
    pub async fn flush(&self) {
        self.gateway.flush().await;
    }

    /// Arrete les taches puis ecrit les dernieres sauvegardes.
    pub async fn shutdown(self) {
        self.window().quit();
        self.shutdown.trigger();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "background task failed");
            }
        }
        self.gateway.flush().await;

        // L'ecrivain s'arrete quand la derniere poignee disparait.
        drop(self.tags);
        drop(self.config);
        drop(self.history);
        drop(self.gateway);
        if let Err(e) = self.writer.await {
            warn!(error = %e, "persistence writer failed");
        }
        debug!("engine stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::port::MemoryClipboard;
    use tempfile::TempDir;

    fn options(dir: &TempDir) -> EngineOptions {
        EngineOptions::new(dir.path()).with_poll_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_start_without_clipboard() {
        let dir = TempDir::new().unwrap();
        let engine = Engine::start(options(&dir), None);
        assert!(engine.get_history().is_empty());
        assert!(matches!(
            engine.save_to_clipboard("x"),
            Err(ScError::Clipboard(_))
        ));
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_auto_hide_after_save() {
        let dir = TempDir::new().unwrap();
        let cb = Arc::new(MemoryClipboard::new());
        let engine = Engine::start(options(&dir), Some(cb.clone()));
        engine.update_config(10, true).unwrap();
        assert_eq!(engine.toggle_window(), WindowState::Visible);
        engine.save_to_clipboard("picked").unwrap();
        assert_eq!(engine.window_state(), WindowState::Hidden);
        assert_eq!(cb.read(EntryKind::Text).unwrap(), Some(b"picked".to_vec()));
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_window_stays_without_auto_hide() {
        let dir = TempDir::new().unwrap();
        let engine = Engine::start(options(&dir), Some(Arc::new(MemoryClipboard::new())));
        engine.toggle_window();
        engine.save_to_clipboard("picked").unwrap();
        assert_eq!(engine.window_state(), WindowState::Visible);
        assert_eq!(engine.request_close(), CloseDecision::Hide);
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_persists_pending_changes() {
        let dir = TempDir::new().unwrap();
        let engine = Engine::start(options(&dir), None);
        let tag = engine.add_tag("work", "#ff0000").unwrap();
        engine.update_config(7, false).unwrap();
        engine.shutdown().await;

        let engine = Engine::start(options(&dir), None);
        let config = engine.get_config();
        assert_eq!(config.max_history, 7);
        assert_eq!(config.tags.len(), 1);
        assert_eq!(config.tags[0].id, tag);
        engine.shutdown().await;
    }
}
