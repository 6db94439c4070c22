// SmartClip - Structure ClipboardEntry
// Represente une entree dans l'historique du presse-papiers
//
// Ce module definit les types de donnees fondamentaux de l'historique :
// - `EntryKind` : type de contenu (texte ou image)
// - `ClipboardEntry` : entree complete avec identifiant, horodatage,
//   contenu et tag optionnel
// - `next_id` : generateur d'identifiants derives de l'horloge
//
// # Identifiants
// Un identifiant est le nombre de nanosecondes depuis l'epoch Unix au
// moment de la creation. Deux appels dans la meme nanoseconde (ou apres
// un recul d'horloge) recoivent des valeurs strictement croissantes :
// le generateur garde la derniere valeur emise dans un compteur atomique.
//
// # Contenu
// Le texte est stocke tel quel. Les images sont stockees sous forme de
// data-URI PNG (`data:image/png;base64,...`), c'est-a-dire la forme
// persistee dans history.json.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Type de contenu de l'entree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Texte UTF-8
    Text,
    /// Image PNG encodee en data-URI
    Image,
}

impl EntryKind {
    /// Nom persiste dans history.json.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }

    /// Parse depuis le nom persiste.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Derniere valeur emise par `next_id`.
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Genere un identifiant unique derive de l'horloge haute resolution.
pub fn next_id() -> u64 {
    let now = Utc::now()
        .timestamp_nanos_opt()
        .map(|n| n.max(0) as u64)
        .unwrap_or_default();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(seen) => last = seen,
        }
    }
}

/// Une entree dans l'historique du presse-papiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    /// Identifiant opaque, fixe a la creation
    pub id: String,
    /// Contenu (texte ou data-URI), partage entre les instantanes
    pub content: Arc<str>,
    /// Type de contenu
    pub kind: EntryKind,
    /// Tag associe, None si l'entree n'est pas classee
    pub tag_id: Option<String>,
    /// Horodatage de creation (UTC)
    pub created_at: DateTime<Utc>,
}

impl ClipboardEntry {
    /// Cree une nouvelle entree avec un identifiant frais et l'heure courante.
    pub fn new(kind: EntryKind, content: impl Into<Arc<str>>) -> Self {
        Self {
            id: next_id().to_string(),
            content: content.into(),
            kind,
            tag_id: None,
            created_at: Utc::now(),
        }
    }

    /// Taille du contenu stocke en octets.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }

    /// Retourne un apercu tronque du contenu.
    pub fn preview(&self, max_len: usize) -> String {
        if self.kind == EntryKind::Image {
            return format!("[image {} KiB]", self.size_bytes() / 1024);
        }
        let first_line = self.content.lines().next().unwrap_or("");
        if first_line.chars().count() <= max_len {
            first_line.to_string()
        } else if max_len < 3 {
            first_line.chars().take(max_len).collect()
        } else {
            let mut s: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
            s.push_str("...");
            s
        }
    }

    /// Age de l'entree par rapport a `now`. Nul si l'horodatage est dans le futur.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).to_std().unwrap_or_default()
    }

    /// Verifie si l'entree a depasse l'age maximal donne.
    pub fn is_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now) > max_age
    }

    /// Verifie si l'entree porte le tag donne.
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tag_id.as_deref() == Some(tag_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entry_preview_short() {
        let e = ClipboardEntry::new(EntryKind::Text, "hello");
        assert_eq!(e.preview(50), "hello");
    }

    #[test]
    fn test_entry_preview_long() {
        let e = ClipboardEntry::new(EntryKind::Text, "a".repeat(100));
        let p = e.preview(20);
        assert_eq!(p.chars().count(), 20);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_entry_preview_never_exceeds_max_len() {
        let e = ClipboardEntry::new(EntryKind::Text, "abcdef");
        assert_eq!(e.preview(0), "");
        assert_eq!(e.preview(2), "ab");
        assert_eq!(e.preview(3), "...");
        assert_eq!(e.preview(4), "a...");
        for n in 0..8 {
            assert!(e.preview(n).chars().count() <= n);
        }
    }

    #[test]
    fn test_entry_preview_multiline() {
        let e = ClipboardEntry::new(EntryKind::Text, "line1\nline2\nline3");
        assert_eq!(e.preview(50), "line1");
    }

    #[test]
    fn test_entry_preview_image() {
        let e = ClipboardEntry::new(EntryKind::Image, "x".repeat(4096));
        assert_eq!(e.preview(50), "[image 4 KiB]");
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let ids: Vec<u64> = (0..1000).map(|_| next_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let set: HashSet<u64> = ids.into_iter().collect();
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..500).map(|_| next_id()).collect::<Vec<_>>()))
            .collect();
        let mut set = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(set.insert(id));
            }
        }
        assert_eq!(set.len(), 4000);
    }

    #[test]
    fn test_age() {
        let mut e = ClipboardEntry::new(EntryKind::Text, "x");
        let now = Utc::now();
        e.created_at = now - chrono::Duration::hours(25);
        assert!(e.is_older_than(Duration::from_secs(24 * 3600), now));
        e.created_at = now - chrono::Duration::hours(23);
        assert!(!e.is_older_than(Duration::from_secs(24 * 3600), now));
        e.created_at = now + chrono::Duration::hours(1);
        assert_eq!(e.age_at(now), Duration::ZERO);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(EntryKind::parse("text"), Some(EntryKind::Text));
        assert_eq!(EntryKind::parse("image"), Some(EntryKind::Image));
        assert_eq!(EntryKind::parse("file"), None);
        assert_eq!(EntryKind::Image.as_str(), "image");
    }
}
