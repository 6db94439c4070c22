// SmartClip - Liste bornee de l'historique
// Structure FIFO, plus recente en tete
//
// Ce module implemente le stockage en memoire des entrees du
// presse-papiers sous forme de liste ordonnee (plus recente en tete).
// Il ne contient aucune synchronisation : `HistoryStore` l'enveloppe
// dans un Mutex.
//
// # Capacite et rotation
// Apres chaque insertion, les entrees en queue (les plus anciennes)
// sont supprimees jusqu'a respecter la capacite.
//
// # Ordre
// Seules `insert` et `move_to_front` changent l'ordre relatif des
// entrees. Toutes les suppressions preservent l'ordre des survivantes.
//
// # Identifiants
// `load_from` ecarte les doublons d'identifiant (la premiere occurrence
// gagne) : aucune autre operation ne peut en introduire.

use crate::history::entry::ClipboardEntry;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;

/// Historique du presse-papiers en memoire.
/// Les entrees sont stockees dans un Vec, les plus recentes en tete.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: Vec<ClipboardEntry>,
    capacity: usize,
}

impl HistoryRing {
    /// Cree une liste vide avec la capacite donnee.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Ajoute une entree en tete puis applique la capacite.
    pub fn insert(&mut self, entry: ClipboardEntry) {
        self.entries.insert(0, entry);
        self.enforce_capacity();
    }

    /// Supprime les entrees excedentaires (les plus anciennes).
    fn enforce_capacity(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.capacity);
        self.entries.truncate(self.capacity);
        excess
    }

    /// Change la capacite et retourne le nombre d'entrees evincees.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity;
        self.enforce_capacity()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Retourne l'entree a l'index donne (0 = plus recente).
    pub fn get(&self, index: usize) -> Option<&ClipboardEntry> {
        self.entries.get(index)
    }

    /// Cherche une entree par identifiant.
    pub fn find(&self, id: &str) -> Option<&ClipboardEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Supprime l'entree portant cet identifiant.
    pub fn remove(&mut self, id: &str) -> Option<ClipboardEntry> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    /// Deplace l'entree en tete. Retourne false si elle est absente.
    pub fn move_to_front(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(0) => true,
            Some(index) => {
                let entry = self.entries.remove(index);
                self.entries.insert(0, entry);
                true
            }
            None => false,
        }
    }

    /// Affecte un tag (ou aucun) a l'entree. Retourne false si elle est absente.
    pub fn set_tag(&mut self, id: &str, tag_id: Option<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.tag_id = tag_id;
                true
            }
            None => false,
        }
    }

    /// Supprime toutes les entrees portant le tag donne.
    pub fn remove_tagged(&mut self, tag_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.has_tag(tag_id));
        before - self.entries.len()
    }

    /// Retire la reference aux tags inconnus. Retourne le nombre d'entrees corrigees.
    pub fn clear_unknown_tags(&mut self, known: &HashSet<&str>) -> usize {
        let mut cleared = 0;
        for entry in &mut self.entries {
            if let Some(tag) = entry.tag_id.as_deref() {
                if !known.contains(tag) {
                    entry.tag_id = None;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Supprime les entrees plus anciennes que `max_age` par rapport a `now`.
    pub fn purge_older_than(&mut self, max_age: Duration, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.is_older_than(max_age, now));
        before - self.entries.len()
    }

    /// Nombre d'entrees dans l'historique.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Capacite maximale.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retourne true si l'historique est vide.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retourne un iterateur sur les entrees (plus recente en premier).
    pub fn iter(&self) -> std::slice::Iter<'_, ClipboardEntry> {
        self.entries.iter()
    }

    /// Reconstruit l'historique a partir d'un vecteur d'entrees.
    /// Les doublons d'identifiant sont ecartes, la capacite est appliquee.
    pub fn load_from(&mut self, entries: Vec<ClipboardEntry>) {
        let mut seen = HashSet::new();
        self.entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        self.enforce_capacity();
    }

    /// Retourne les entrees comme vecteur (pour la serialisation).
    pub fn to_vec(&self) -> Vec<ClipboardEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::EntryKind;

    fn make_entry(content: &str) -> ClipboardEntry {
        ClipboardEntry::new(EntryKind::Text, content)
    }

    fn contents(ring: &HistoryRing) -> Vec<&str> {
        ring.iter().map(|e| &*e.content).collect()
    }

    #[test]
    fn test_insert_newest_first() {
        let mut ring = HistoryRing::new(10);
        ring.insert(make_entry("hello"));
        ring.insert(make_entry("world"));
        assert_eq!(contents(&ring), vec!["world", "hello"]);
    }

    #[test]
    fn test_capacity_enforcement() {
        let mut ring = HistoryRing::new(3);
        for c in ["a", "b", "c", "d"] {
            ring.insert(make_entry(c));
            assert!(ring.len() <= 3);
        }
        // "a" (la plus ancienne) doit avoir ete supprimee
        assert_eq!(contents(&ring), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut ring = HistoryRing::new(0);
        ring.insert(make_entry("a"));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_shrink_capacity() {
        let mut ring = HistoryRing::new(5);
        for c in ["a", "b", "c", "d"] {
            ring.insert(make_entry(c));
        }
        assert_eq!(ring.set_capacity(2), 2);
        assert_eq!(contents(&ring), vec!["d", "c"]);
        assert_eq!(ring.set_capacity(10), 0);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut ring = HistoryRing::new(10);
        ring.insert(make_entry("a"));
        ring.insert(make_entry("b"));
        ring.insert(make_entry("c"));
        let id = ring.get(1).unwrap().id.clone();
        assert_eq!(&*ring.remove(&id).unwrap().content, "b");
        assert_eq!(contents(&ring), vec!["c", "a"]);
        assert!(ring.remove(&id).is_none());
    }

    #[test]
    fn test_move_to_front() {
        let mut ring = HistoryRing::new(10);
        ring.insert(make_entry("a"));
        ring.insert(make_entry("b"));
        ring.insert(make_entry("c"));
        let a = ring.get(2).unwrap().clone();
        assert!(ring.move_to_front(&a.id));
        assert_eq!(contents(&ring), vec!["a", "c", "b"]);
        assert_eq!(ring.get(0).unwrap(), &a);
        // deja en tete : succes sans changement
        assert!(ring.move_to_front(&a.id));
        assert_eq!(contents(&ring), vec!["a", "c", "b"]);
        assert!(!ring.move_to_front("missing"));
    }

    #[test]
    fn test_set_tag_and_remove_tagged() {
        let mut ring = HistoryRing::new(10);
        ring.insert(make_entry("a"));
        ring.insert(make_entry("b"));
        ring.insert(make_entry("c"));
        let a = ring.get(2).unwrap().id.clone();
        let c = ring.get(0).unwrap().id.clone();
        assert!(ring.set_tag(&a, Some("t1".into())));
        assert!(ring.set_tag(&c, Some("t1".into())));
        assert!(!ring.set_tag("missing", Some("t1".into())));
        assert_eq!(ring.remove_tagged("t1"), 2);
        assert_eq!(contents(&ring), vec!["b"]);
    }

    #[test]
    fn test_purge_older_than() {
        let now = Utc::now();
        let mut ring = HistoryRing::new(10);
        let mut old = make_entry("old");
        old.created_at = now - chrono::Duration::hours(30);
        let mut recent = make_entry("recent");
        recent.created_at = now - chrono::Duration::hours(2);
        ring.load_from(vec![make_entry("fresh"), recent, old]);
        let removed = ring.purge_older_than(Duration::from_secs(24 * 3600), now);
        assert_eq!(removed, 1);
        assert_eq!(contents(&ring), vec!["fresh", "recent"]);
    }

    #[test]
    fn test_load_from_drops_duplicate_ids_and_trims() {
        let a = make_entry("a");
        let mut dup = make_entry("dup");
        dup.id = a.id.clone();
        let mut ring = HistoryRing::new(2);
        ring.load_from(vec![a, dup, make_entry("b"), make_entry("c")]);
        assert_eq!(contents(&ring), vec!["a", "b"]);
    }

    #[test]
    fn test_clear_unknown_tags() {
        let mut ring = HistoryRing::new(10);
        ring.insert(make_entry("a"));
        ring.insert(make_entry("b"));
        let a = ring.get(1).unwrap().id.clone();
        let b = ring.get(0).unwrap().id.clone();
        ring.set_tag(&a, Some("known".into()));
        ring.set_tag(&b, Some("ghost".into()));
        let known: HashSet<&str> = ["known"].into_iter().collect();
        assert_eq!(ring.clear_unknown_tags(&known), 1);
        assert_eq!(ring.find(&a).unwrap().tag_id.as_deref(), Some("known"));
        assert_eq!(ring.find(&b).unwrap().tag_id, None);
    }
}
