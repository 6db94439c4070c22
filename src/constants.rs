// SmartClip - Constantes globales
//
// Ce module centralise toutes les constantes du moteur :
// - Bornes de l'historique (nombre d'entrees, age maximal)
// - Limites de taille des images (plafond dur, plafond souple)
// - Intervalles des taches periodiques (sondage, balayage)
// - Noms de fichiers et repertoires
//
// Les constantes sont utilisees par les modules history, clipboard,
// storage, sweeper et app pour garantir la coherence des valeurs.

use std::time::Duration;

/// Nombre max d'entrees accepte par `UpdateConfig`
pub const MAX_HISTORY_LIMIT: usize = 50;

/// Nombre max d'entrees par defaut
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Plafond dur d'une image brute (10 Mio) : au-dela, rejet
pub const IMAGE_HARD_CAP_BYTES: usize = 10 * 1024 * 1024;

/// Plafond souple d'une image encodee (1 Mio) : au-dela, reduction
pub const IMAGE_SOFT_CAP_BYTES: usize = 1024 * 1024;

/// Age maximal d'une entree avant purge (24 h)
pub const RETENTION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Intervalle entre deux balayages de retention (10 min)
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Intervalle de sondage du presse-papiers systeme
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Profondeur des files d'observations par type de contenu
pub const OBSERVATION_QUEUE_DEPTH: usize = 16;

/// Profondeur du canal de notifications vers la couche de presentation
pub const EVENT_CHANNEL_DEPTH: usize = 64;

/// Prefixe des images encodees en data-URI
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Nom du dossier application dans le repertoire de configuration
pub const APP_DIR_NAME: &str = "clipboard";

/// Nom du fichier de configuration
pub const CONFIG_FILENAME: &str = "config.json";

/// Nom du fichier d'historique
pub const HISTORY_FILENAME: &str = "history.json";

/// Prefixe des identifiants de tags
pub const TAG_ID_PREFIX: &str = "tag_";

/// Variable d'environnement qui remplace le repertoire de donnees
pub const DATA_DIR_ENV: &str = "SMARTCLIP_DATA_DIR";
