// SmartClip - Configuration partagee
//
// `ConfigStore` protege la configuration par un Mutex distinct de celui
// de l'historique. Meme discipline que HistoryStore : mutation en
// memoire sous le verrou, instantane versionne, sauvegarde postee apres
// liberation.
//
// # Ordre des verrous
// Une operation qui touche aux deux ressources prend toujours le verrou
// de la configuration avant celui de l'historique (jamais l'inverse).

use crate::config::settings::{validate_max_history, Config};
use crate::error::ScResult;
use crate::history::store::HistoryStore;
use crate::storage::gateway::PersistenceGateway;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

struct ConfigState {
    config: Config,
    version: u64,
}

/// Configuration partagee entre l'API et le registre de tags.
pub struct ConfigStore {
    state: Mutex<ConfigState>,
    gateway: PersistenceGateway,
}

impl ConfigStore {
    pub fn new(config: Config, gateway: PersistenceGateway) -> Self {
        Self {
            state: Mutex::new(ConfigState { config, version: 0 }),
            gateway,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConfigState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copie de la configuration courante.
    pub fn get(&self) -> Config {
        self.lock().config.clone()
    }

    /// Lecture sous le verrou, sans copie.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Config) -> R) -> R {
        f(&self.lock().config)
    }

    /// Applique une mutation sous le verrou puis poste la sauvegarde.
    ///
    /// `f` doit valider ses arguments avant de modifier la configuration :
    /// en cas d'erreur, rien n'est sauvegarde.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Config) -> ScResult<R>) -> ScResult<R> {
        let (result, version, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut state.config)?;
            state.version += 1;
            (result, state.version, state.config.clone())
        };
        self.gateway.save_config(version, snapshot);
        Ok(result)
    }

    /// Met a jour `maxHistory` et `autoHide`, puis applique la nouvelle
    /// capacite a l'historique. Retourne le nombre d'entrees evincees.
    ///
    /// # Errors
    /// `InvalidArgument` si `max_history` depasse la borne ; la
    /// configuration reste alors inchangee.
    pub fn update(&self, max_history: usize, auto_hide: bool, history: &HistoryStore) -> ScResult<usize> {
        self.mutate(|config| {
            validate_max_history(max_history)?;
            config.max_history = max_history;
            config.auto_hide = auto_hide;
            let evicted = history.set_capacity(max_history);
            info!(max_history, auto_hide, evicted, "configuration updated");
            Ok(evicted)
        })
    }
}
