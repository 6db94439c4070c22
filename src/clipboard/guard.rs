// SmartClip - Filtrage des observations du presse-papiers
//
// Chaque valeur lue par les pollers passe par `DedupGuard::admit` avant
// d'entrer dans l'historique. Dans l'ordre :
// 1. drapeau skip-next arme : l'observation est ignoree et le drapeau
//    retombe (une seule observation ignoree par armement, quel que soit
//    le type de contenu) ;
// 2. valeur vide ou identique a la derniere vue sur ce flux : ignoree ;
// 3. image au-dela du plafond dur : refusee, la derniere valeur vue
//    n'est pas mise a jour (une nouvelle copie identique sera refusee
//    a nouveau) ;
// 4. sinon la valeur est acceptee et devient la derniere vue.
//
// Les flux texte et image ont chacun leur derniere valeur vue.
//
// Le drapeau `SkipNext` est partage avec le chemin d'ecriture
// (`injector`), qui l'arme juste avant d'ecrire dans le presse-papiers.

use crate::constants::IMAGE_HARD_CAP_BYTES;
use crate::error::ScError;
use crate::history::entry::EntryKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Drapeau "ignorer la prochaine observation".
#[derive(Clone, Default)]
pub struct SkipNext(Arc<AtomicBool>);

impl SkipNext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Retombe le drapeau et retourne son ancien etat.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }

    pub fn is_armed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Verdict sur une observation.
#[derive(Debug)]
pub enum Admission {
    /// Echo d'une ecriture du moteur.
    Skipped,
    /// Vide ou identique a la derniere valeur vue.
    Unchanged,
    /// Nouvelle valeur a inserer.
    Accepted,
    /// Valeur refusee, a signaler a l'utilisateur.
    Rejected(ScError),
}

/// Filtre des observations, possede par le watcher.
pub struct DedupGuard {
    skip: SkipNext,
    last_text: Option<Vec<u8>>,
    last_image: Option<Vec<u8>>,
    hard_cap: usize,
}

impl DedupGuard {
    pub fn new(skip: SkipNext) -> Self {
        Self::with_hard_cap(skip, IMAGE_HARD_CAP_BYTES)
    }

    pub fn with_hard_cap(skip: SkipNext, hard_cap: usize) -> Self {
        Self {
            skip,
            last_text: None,
            last_image: None,
            hard_cap,
        }
    }

    fn last_mut(&mut self, kind: EntryKind) -> &mut Option<Vec<u8>> {
        match kind {
            EntryKind::Text => &mut self.last_text,
            EntryKind::Image => &mut self.last_image,
        }
    }

    /// Decide du sort d'une observation.
    pub fn admit(&mut self, kind: EntryKind, payload: &[u8]) -> Admission {
        if self.skip.take() {
            debug!(kind = kind.as_str(), "self-written clipboard value skipped");
            return Admission::Skipped;
        }
        if payload.is_empty() {
            return Admission::Unchanged;
        }
        if self.last_mut(kind).as_deref() == Some(payload) {
            return Admission::Unchanged;
        }
        if kind == EntryKind::Image && payload.len() > self.hard_cap {
            warn!(size = payload.len(), cap = self.hard_cap, "image rejected");
            return Admission::Rejected(ScError::ResourceLimitExceeded(format!(
                "image too large: {} MiB (max {} MiB)",
                payload.len() / (1024 * 1024),
                self.hard_cap / (1024 * 1024)
            )));
        }
        *self.last_mut(kind) = Some(payload.to_vec());
        Admission::Accepted
    }
}
