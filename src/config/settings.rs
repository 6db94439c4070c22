// SmartClip - Structure de configuration et valeurs par defaut
//
// Ce module definit la structure `Config` persistee dans config.json :
// - `maxHistory` : nombre maximal d'entrees conservees
// - `tags`       : sequence ordonnee des tags definis par l'utilisateur
// - `autoHide`   : masquage automatique de la fenetre apres selection
//
// # Chargement
// Les champs absents du document conservent leur valeur par defaut
// (`#[serde(default)]`). Une valeur `maxHistory` hors borne lue sur
// disque est ramenee dans l'intervalle autorise par `sanitize`.
//
// # Validation
// La borne de `maxHistory` est verifiee a la frontiere de mutation
// (`validate_max_history`), pas par le type lui-meme.

use crate::constants::*;
use crate::error::{ScError, ScResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Etiquette de classement des entrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Configuration persistee de l'application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub max_history: usize,
    pub tags: Vec<Tag>,
    pub auto_hide: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            tags: Vec::new(),
            auto_hide: false,
        }
    }
}

impl Config {
    /// Ramene une configuration lue sur disque dans un etat valide :
    /// borne `maxHistory`, ecarte les tags en double (le premier gagne).
    pub fn sanitize(mut self) -> Self {
        if self.max_history > MAX_HISTORY_LIMIT {
            warn!(
                max_history = self.max_history,
                limit = MAX_HISTORY_LIMIT,
                "persisted maxHistory above limit, clamping"
            );
            self.max_history = MAX_HISTORY_LIMIT;
        }
        let mut seen = HashSet::new();
        self.tags.retain(|t| seen.insert(t.id.clone()));
        self
    }

    /// Cherche un tag par identifiant.
    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// Ensemble des identifiants de tags.
    pub fn tag_ids(&self) -> HashSet<&str> {
        self.tags.iter().map(|t| t.id.as_str()).collect()
    }
}

/// Verifie qu'une valeur de `maxHistory` est acceptable.
pub fn validate_max_history(max_history: usize) -> ScResult<()> {
    if max_history > MAX_HISTORY_LIMIT {
        return Err(ScError::InvalidArgument(format!(
            "maxHistory cannot exceed {} (got {})",
            MAX_HISTORY_LIMIT, max_history
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = Config::default();
        assert_eq!(c.max_history, 50);
        assert!(c.tags.is_empty());
        assert!(!c.auto_hide);
    }

    #[test]
    fn test_json_field_names() {
        let c = Config {
            max_history: 20,
            tags: vec![Tag { id: "tag_1".into(), name: "work".into(), color: "#ff0000".into() }],
            auto_hide: true,
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["maxHistory"], 20);
        assert_eq!(v["autoHide"], true);
        assert_eq!(v["tags"][0]["color"], "#ff0000");
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let c: Config = serde_json::from_str(r#"{"maxHistory": 10}"#).unwrap();
        assert_eq!(c.max_history, 10);
        assert!(c.tags.is_empty());
        assert!(!c.auto_hide);
    }

    #[test]
    fn test_sanitize() {
        let t = Tag { id: "a".into(), name: "x".into(), color: "red".into() };
        let c = Config { max_history: 500, tags: vec![t.clone(), t.clone()], auto_hide: false };
        let c = c.sanitize();
        assert_eq!(c.max_history, MAX_HISTORY_LIMIT);
        assert_eq!(c.tags, vec![t]);
    }

    #[test]
    fn test_validate_max_history() {
        assert!(validate_max_history(0).is_ok());
        assert!(validate_max_history(50).is_ok());
        assert!(matches!(validate_max_history(51), Err(ScError::InvalidArgument(_))));
    }
}
