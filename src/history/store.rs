// SmartClip - Historique partage
// Domaine d'exclusion mutuelle unique autour de HistoryRing
//
// `HistoryStore` est le seul proprietaire de la liste d'historique.
// Les appelants n'obtiennent jamais de reference mutable : ils passent
// par les operations ci-dessous ou recoivent un instantane (copie).
//
// # Verrouillage
// Chaque operation prend le Mutex, applique la mutation en memoire,
// incremente la version, copie un instantane puis relache le verrou.
// La sauvegarde est postee au PersistenceGateway apres la liberation.
// Les contenus etant des `Arc<str>`, l'instantane ne copie que les
// metadonnees.
//
// # Versions
// Deux mutations concurrentes peuvent poster leurs instantanes dans le
// desordre. Le numero de version permet a l'ecrivain de ne jamais
// ecraser un etat recent par un etat plus ancien.

use crate::error::{ScError, ScResult};
use crate::history::entry::{ClipboardEntry, EntryKind};
use crate::history::ring::HistoryRing;
use crate::storage::gateway::PersistenceGateway;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Etat protege par le Mutex.
struct HistoryState {
    ring: HistoryRing,
    version: u64,
}

/// Historique du presse-papiers partage entre les taches.
pub struct HistoryStore {
    state: Mutex<HistoryState>,
    gateway: PersistenceGateway,
}

impl HistoryStore {
    /// Cree l'historique a partir des entrees chargees au demarrage.
    pub fn new(capacity: usize, entries: Vec<ClipboardEntry>, gateway: PersistenceGateway) -> Self {
        let mut ring = HistoryRing::new(capacity);
        ring.load_from(entries);
        Self {
            state: Mutex::new(HistoryState { ring, version: 0 }),
            gateway,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        // Les operations du ring ne laissent pas d'etat partiel : un verrou
        // empoisonne reste utilisable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applique une mutation sous le verrou puis poste la sauvegarde.
    /// La sauvegarde n'a lieu que si `f` signale un changement.
    fn mutate<R>(&self, f: impl FnOnce(&mut HistoryRing) -> (R, bool)) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let (result, changed) = f(&mut state.ring);
            if changed {
                state.version += 1;
                (result, Some((state.version, state.ring.to_vec())))
            } else {
                (result, None)
            }
        };
        if let Some((version, entries)) = snapshot {
            self.gateway.save_history(version, entries);
        }
        result
    }

    /// Insere un nouveau contenu en tete et retourne son identifiant.
    pub fn insert(&self, kind: EntryKind, content: impl Into<std::sync::Arc<str>>) -> String {
        let entry = ClipboardEntry::new(kind, content);
        let id = entry.id.clone();
        let size = entry.size_bytes();
        self.mutate(|ring| {
            ring.insert(entry);
            ((), true)
        });
        debug!(id = %id, kind = kind.as_str(), size, "history entry inserted");
        id
    }

    /// Supprime l'entree portant cet identifiant.
    pub fn delete(&self, id: &str) -> ScResult<()> {
        self.mutate(|ring| match ring.remove(id) {
            Some(_) => (Ok(()), true),
            None => (Err(ScError::item_not_found(id)), false),
        })
    }

    /// Deplace l'entree en tete de l'historique.
    pub fn move_to_front(&self, id: &str) -> ScResult<()> {
        self.mutate(|ring| {
            if ring.get(0).map(|e| e.id == id).unwrap_or(false) {
                return (Ok(()), false);
            }
            if ring.move_to_front(id) {
                (Ok(()), true)
            } else {
                (Err(ScError::item_not_found(id)), false)
            }
        })
    }

    /// Affecte un tag a l'entree. `None` retire le tag.
    ///
    /// Ne verifie pas que le tag existe : c'est le role de TagRegistry.
    pub fn update_tag(&self, id: &str, tag_id: Option<String>) -> ScResult<()> {
        self.mutate(|ring| {
            if ring.set_tag(id, tag_id) {
                (Ok(()), true)
            } else {
                (Err(ScError::item_not_found(id)), false)
            }
        })
    }

    /// Supprime les entrees plus anciennes que `max_age`.
    /// Retourne le nombre d'entrees supprimees.
    pub fn purge_older_than(&self, max_age: Duration) -> usize {
        let now = Utc::now();
        self.mutate(|ring| {
            let removed = ring.purge_older_than(max_age, now);
            (removed, removed > 0)
        })
    }

    /// Supprime toutes les entrees portant le tag donne (suppression en cascade).
    pub fn remove_tagged(&self, tag_id: &str) -> usize {
        self.mutate(|ring| {
            let removed = ring.remove_tagged(tag_id);
            (removed, removed > 0)
        })
    }

    /// Retire les references vers des tags qui n'existent plus.
    pub fn clear_unknown_tags(&self, known: &HashSet<&str>) -> usize {
        self.mutate(|ring| {
            let cleared = ring.clear_unknown_tags(known);
            (cleared, cleared > 0)
        })
    }

    /// Change la capacite. Retourne le nombre d'entrees evincees.
    pub fn set_capacity(&self, capacity: usize) -> usize {
        self.mutate(|ring| {
            let evicted = ring.set_capacity(capacity);
            (evicted, evicted > 0)
        })
    }

    /// Instantane coherent de l'historique (plus recente en premier).
    pub fn snapshot(&self) -> Vec<ClipboardEntry> {
        self.lock().ring.to_vec()
    }

    /// Nombre d'entrees.
    pub fn len(&self) -> usize {
        self.lock().ring.len()
    }

    /// Retourne true si l'historique est vide.
    pub fn is_empty(&self) -> bool {
        self.lock().ring.is_empty()
    }

    /// Capacite courante.
    pub fn capacity(&self) -> usize {
        self.lock().ring.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store(capacity: usize) -> HistoryStore {
        HistoryStore::new(capacity, Vec::new(), PersistenceGateway::disabled())
    }

    #[test]
    fn test_insert_is_newest_first_and_bounded() {
        let s = store(3);
        for i in 0..10 {
            let id = s.insert(EntryKind::Text, format!("v{}", i));
            assert_eq!(s.snapshot()[0].id, id);
            assert!(s.len() <= 3);
        }
        let contents: Vec<String> = s.snapshot().iter().map(|e| e.content.to_string()).collect();
        assert_eq!(contents, vec!["v9", "v8", "v7"]);
    }

    #[test]
    fn test_delete() {
        let s = store(10);
        let a = s.insert(EntryKind::Text, "a");
        let b = s.insert(EntryKind::Text, "b");
        let c = s.insert(EntryKind::Text, "c");
        s.delete(&b).unwrap();
        let ids: Vec<String> = s.snapshot().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c, a]);
        assert!(matches!(s.delete(&b), Err(ScError::NotFound(_))));
    }

    #[test]
    fn test_move_to_front() {
        let s = store(10);
        let a = s.insert(EntryKind::Text, "a");
        let b = s.insert(EntryKind::Text, "b");
        let before = s.snapshot()[1].clone();
        s.move_to_front(&a).unwrap();
        let snap = s.snapshot();
        assert_eq!(snap[0], before);
        assert_eq!(snap[1].id, b);
        s.move_to_front(&a).unwrap();
        assert_eq!(s.snapshot()[0].id, a);
        assert!(matches!(s.move_to_front("nope"), Err(ScError::NotFound(_))));
    }

    #[test]
    fn test_update_tag() {
        let s = store(10);
        let a = s.insert(EntryKind::Text, "a");
        s.update_tag(&a, Some("tag_1".into())).unwrap();
        assert_eq!(s.snapshot()[0].tag_id.as_deref(), Some("tag_1"));
        s.update_tag(&a, None).unwrap();
        assert_eq!(s.snapshot()[0].tag_id, None);
        assert!(matches!(s.update_tag("nope", None), Err(ScError::NotFound(_))));
    }

    #[test]
    fn test_purge_keeps_recent() {
        let now = Utc::now();
        let mut old = ClipboardEntry::new(EntryKind::Text, "old");
        old.created_at = now - chrono::Duration::hours(25);
        let mut young = ClipboardEntry::new(EntryKind::Text, "young");
        young.created_at = now - chrono::Duration::hours(23);
        let s = HistoryStore::new(10, vec![young.clone(), old], PersistenceGateway::disabled());
        assert_eq!(s.purge_older_than(Duration::from_secs(24 * 3600)), 1);
        assert_eq!(s.snapshot(), vec![young]);
    }

    #[test]
    fn test_set_capacity_trims_tail() {
        let s = store(10);
        for i in 0..6 {
            s.insert(EntryKind::Text, format!("v{}", i));
        }
        assert_eq!(s.set_capacity(4), 2);
        assert_eq!(s.len(), 4);
        assert_eq!(&*s.snapshot()[3].content, "v2");
    }

    #[test]
    fn test_concurrent_inserts_lose_nothing() {
        let s = Arc::new(store(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let s = Arc::clone(&s);
                std::thread::spawn(move || {
                    (0..5)
                        .map(|i| s.insert(EntryKind::Text, format!("{}-{}", t, i)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut returned = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(returned.insert(id));
            }
        }
        let stored: HashSet<String> = s.snapshot().into_iter().map(|e| e.id).collect();
        assert_eq!(stored.len(), 40);
        assert_eq!(stored, returned);
    }
}
