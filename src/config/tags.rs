// SmartClip - Registre des tags
//
// `TagRegistry` gere la sequence ordonnee des tags stockee dans la
// configuration, et ses effets sur l'historique :
// - `add_tag`     : cree un tag et l'ajoute en fin de sequence
// - `update_tag`  : renomme / recolore un tag existant
// - `delete_tag`  : retire le tag puis supprime toutes les entrees qui le
//                   portent (suppression en cascade, pas de simple
//                   detachement)
// - `reorder`     : remplace l'ordre des tags par une permutation exacte
// - `assign`      : affecte un tag existant (ou aucun) a une entree
//
// # Invariant
// Aucune entree ne reference un tag absent. `delete_tag` et `assign`
// tiennent le verrou de la configuration pendant qu'ils touchent a
// l'historique, si bien qu'une affectation ne peut pas s'intercaler
// entre le retrait du tag et la purge des entrees.

use crate::config::settings::Tag;
use crate::config::store::ConfigStore;
use crate::constants::TAG_ID_PREFIX;
use crate::error::{ScError, ScResult};
use crate::history::entry::next_id;
use crate::history::store::HistoryStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Operations sur les tags et leurs effets en cascade.
#[derive(Clone)]
pub struct TagRegistry {
    config: Arc<ConfigStore>,
    history: Arc<HistoryStore>,
}

impl TagRegistry {
    pub fn new(config: Arc<ConfigStore>, history: Arc<HistoryStore>) -> Self {
        Self { config, history }
    }

    /// Sequence courante des tags, dans l'ordre utilisateur.
    pub fn tags(&self) -> Vec<Tag> {
        self.config.read(|c| c.tags.clone())
    }

    /// Cree un tag et retourne son identifiant.
    pub fn add_tag(&self, name: &str, color: &str) -> ScResult<String> {
        let tag = Tag {
            id: format!("{}{}", TAG_ID_PREFIX, next_id()),
            name: name.to_string(),
            color: color.to_string(),
        };
        let id = tag.id.clone();
        self.config.mutate(|c| {
            c.tags.push(tag);
            Ok(())
        })?;
        info!(tag = %id, "tag added");
        Ok(id)
    }

    /// Modifie le nom et la couleur d'un tag.
    pub fn update_tag(&self, id: &str, name: &str, color: &str) -> ScResult<()> {
        self.config.mutate(|c| {
            let tag = c
                .tags
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ScError::tag_not_found(id))?;
            tag.name = name.to_string();
            tag.color = color.to_string();
            Ok(())
        })
    }

    /// Supprime un tag et toutes les entrees qui le portent.
    /// Retourne le nombre d'entrees supprimees.
    pub fn delete_tag(&self, id: &str) -> ScResult<usize> {
        let removed = self.config.mutate(|c| {
            let pos = c
                .tags
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| ScError::tag_not_found(id))?;
            c.tags.remove(pos);
            Ok(self.history.remove_tagged(id))
        })?;
        info!(tag = %id, removed_entries = removed, "tag deleted");
        Ok(removed)
    }

    /// Reordonne les tags selon `ids`, qui doit etre une permutation exacte
    /// des identifiants existants.
    pub fn reorder(&self, ids: &[String]) -> ScResult<()> {
        self.config.mutate(|c| {
            if ids.len() != c.tags.len() {
                return Err(ScError::InvalidArgument(format!(
                    "invalid tags count: expected {}, got {}",
                    c.tags.len(),
                    ids.len()
                )));
            }
            let mut seen = HashSet::with_capacity(ids.len());
            let mut reordered = Vec::with_capacity(ids.len());
            for id in ids {
                if !seen.insert(id.as_str()) {
                    return Err(ScError::InvalidArgument(format!("duplicate tag id: {}", id)));
                }
                let tag = c
                    .tag(id)
                    .ok_or_else(|| ScError::InvalidArgument(format!("unknown tag id: {}", id)))?;
                reordered.push(tag.clone());
            }
            c.tags = reordered;
            Ok(())
        })
    }

    /// Affecte un tag a une entree. Un identifiant vide retire le tag.
    ///
    /// # Errors
    /// `NotFound` si le tag n'existe pas ou si l'entree est absente.
    pub fn assign(&self, item_id: &str, tag_id: &str) -> ScResult<()> {
        if tag_id.is_empty() {
            return self.history.update_tag(item_id, None);
        }
        self.config.read(|c| {
            if c.tag(tag_id).is_none() {
                return Err(ScError::tag_not_found(tag_id));
            }
            self.history.update_tag(item_id, Some(tag_id.to_string()))
        })
    }
}
