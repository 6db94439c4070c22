// SmartClip - Types d'erreur centralises
//
// Ce module definit l'enumeration `ScError` et le type alias
// `ScResult<T>` utilises dans toute la crate.
//
// # Categories d'erreurs
// - `NotFound` : entree ou tag absent (delete/move/update)
// - `InvalidArgument` : liste de tags non conforme, maxHistory hors borne,
//   data-URI malforme
// - `ResourceLimitExceeded` : image au-dela du plafond dur
// - `DecodeFailure` : payload base64 ou PNG illisible
// - `Clipboard` : echec d'acces au presse-papiers systeme
// - `Storage` : erreur d'I/O disque (lecture/ecriture des documents)
// - `Serialization` : document JSON invalide
//
// Les quatre premieres categories remontent a l'appelant de l'API.
// `Storage` et `Serialization` ne sortent jamais de la couche de
// persistance : elles sont journalisees puis ignorees.
//
// Le `Display` de chaque variante porte un prefixe entre crochets pour
// faciliter le diagnostic dans les logs.

use thiserror::Error;

/// Enumeration de toutes les erreurs possibles dans SmartClip.
#[derive(Debug, Error)]
pub enum ScError {
    /// Entree ou tag introuvable
    #[error("[NotFound] {0}")]
    NotFound(String),
    /// Argument refuse par la validation
    #[error("[InvalidArgument] {0}")]
    InvalidArgument(String),
    /// Taille au-dela du plafond autorise
    #[error("[ResourceLimitExceeded] {0}")]
    ResourceLimitExceeded(String),
    /// Donnees encodees illisibles
    #[error("[DecodeFailure] {0}")]
    DecodeFailure(String),
    /// Erreur du presse-papiers systeme
    #[error("[Clipboard] {0}")]
    Clipboard(String),
    /// Erreur de lecture/ecriture disque
    #[error("[Storage] {0}")]
    Storage(#[from] std::io::Error),
    /// Document JSON invalide
    #[error("[Serialization] {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScError {
    /// Raccourci pour une entree d'historique absente.
    pub fn item_not_found(id: &str) -> Self {
        ScError::NotFound(format!("item not found: {}", id))
    }

    /// Raccourci pour un tag absent.
    pub fn tag_not_found(id: &str) -> Self {
        ScError::NotFound(format!("tag not found: {}", id))
    }
}

/// Type Result specialise pour SmartClip.
pub type ScResult<T> = Result<T, ScError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        let e = ScError::item_not_found("42");
        assert_eq!(e.to_string(), "[NotFound] item not found: 42");
        let e = ScError::InvalidArgument("bad".into());
        assert!(e.to_string().starts_with("[InvalidArgument]"));
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let e: ScError = io.into();
        assert!(matches!(e, ScError::Storage(_)));
    }
}
