// SmartClip - Port d'acces au presse-papiers
//
// `ClipboardPort` est la seule facon pour le moteur de toucher au
// presse-papiers du systeme : lire la valeur courante d'un type de
// contenu, et ecrire une valeur. La detection des changements est
// construite au-dessus par `monitor` (sondage).
//
// Les appels sont bloquants et peuvent etre lents (lecture d'une image) :
// le moteur les execute sur des threads bloquants.
//
// `MemoryClipboard` est une implementation en memoire, utilisee par les
// tests et par les integrations sans presse-papiers systeme.

use crate::error::ScResult;
use crate::history::entry::EntryKind;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Capacite de lecture/ecriture du presse-papiers.
///
/// Texte : octets UTF-8. Image : octets PNG.
pub trait ClipboardPort: Send + Sync + 'static {
    /// Lit la valeur courante. `None` si le presse-papiers ne contient
    /// pas ce type de contenu.
    fn read(&self, kind: EntryKind) -> ScResult<Option<Vec<u8>>>;

    /// Remplace le contenu du presse-papiers.
    fn write(&self, kind: EntryKind, payload: &[u8]) -> ScResult<()>;
}

/// Presse-papiers en memoire.
///
/// Comme un presse-papiers systeme, une ecriture remplace tout le
/// contenu : ecrire du texte efface l'image et inversement.
#[derive(Default)]
pub struct MemoryClipboard {
    slots: Mutex<HashMap<EntryKind, Vec<u8>>>,
    writes: Mutex<Vec<(EntryKind, Vec<u8>)>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&self, kind: EntryKind, payload: &[u8]) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.clear();
        slots.insert(kind, payload.to_vec());
    }

    /// Simule une copie de texte par l'utilisateur.
    pub fn copy_text(&self, text: &str) {
        self.replace(EntryKind::Text, text.as_bytes());
    }

    /// Simule une copie d'image (octets PNG) par l'utilisateur.
    pub fn copy_image(&self, png: &[u8]) {
        self.replace(EntryKind::Image, png);
    }

    /// Ecritures effectuees via le port, dans l'ordre.
    pub fn writes(&self) -> Vec<(EntryKind, Vec<u8>)> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read(&self, kind: EntryKind) -> ScResult<Option<Vec<u8>>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(&kind).cloned())
    }

    fn write(&self, kind: EntryKind, payload: &[u8]) -> ScResult<()> {
        self.replace(kind, payload);
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, payload.to_vec()));
        Ok(())
    }
}
