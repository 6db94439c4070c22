// SmartClip - Lecture/ecriture des documents sur disque
//
// Ce module gere l'emplacement et les acces fichiers des deux documents
// persistes : config.json et history.json.
//
// # Emplacement
// `<repertoire de configuration utilisateur>/clipboard/`, par exemple
// `~/.config/clipboard/` sous Linux ou `%APPDATA%\clipboard\` sous
// Windows. Si le repertoire utilisateur est introuvable, le dossier
// relatif `./clipboard` est utilise.
//
// # Ecriture
// L'ecriture est atomique (fichier temporaire + rename) et cree le
// repertoire au besoin.
//
// # Chargement
// `load_config` et `load_history` ne retournent jamais d'erreur : un
// fichier absent ou illisible donne la valeur par defaut, avec un
// avertissement dans les logs si le fichier existait.

use crate::config::settings::Config;
use crate::constants::*;
use crate::error::ScResult;
use crate::history::entry::ClipboardEntry;
use crate::storage::format;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Chemins des documents persistes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    dir: PathBuf,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Repertoire par defaut de l'utilisateur courant.
    pub fn user_default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(APP_DIR_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Retourne le chemin du fichier de configuration.
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILENAME)
    }

    /// Retourne le chemin du fichier d'historique.
    pub fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILENAME)
    }
}

/// Ecrit un fichier de maniere atomique (temp + rename).
pub fn write_atomic(path: &Path, data: &[u8]) -> ScResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Lit un fichier. None s'il n'existe pas ou ne peut pas etre lu.
fn read_optional(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Some(data),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "document not found, using defaults");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read document, using defaults");
            None
        }
    }
}

/// Charge la configuration, ou la configuration par defaut.
pub fn load_config(paths: &DataPaths) -> Config {
    let path = paths.config_path();
    let Some(data) = read_optional(&path) else {
        return Config::default();
    };
    match format::decode_config(&data) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt config document, using defaults");
            Config::default()
        }
    }
}

/// Charge l'historique, ou un historique vide.
pub fn load_history(paths: &DataPaths) -> Vec<ClipboardEntry> {
    let path = paths.history_path();
    let Some(data) = read_optional(&path) else {
        return Vec::new();
    };
    match format::decode_history(&data) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt history document, starting empty");
            Vec::new()
        }
    }
}

/// Sauvegarde la configuration.
pub fn save_config(paths: &DataPaths, config: &Config) -> ScResult<()> {
    write_atomic(&paths.config_path(), &format::encode_config(config)?)
}

/// Sauvegarde l'historique.
pub fn save_history(paths: &DataPaths, entries: &[ClipboardEntry]) -> ScResult<()> {
    write_atomic(&paths.history_path(), &format::encode_history(entries)?)
}
