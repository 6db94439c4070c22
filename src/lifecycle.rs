// SmartClip - Cycle de vie
//
// Ce module remplace les drapeaux globaux "en cours de fermeture" /
// "fenetre visible" par deux objets explicites :
// - `ShutdownSignal` : signal d'arret diffuse une seule fois a toutes les
//   taches (surveillance, balayage). Construit sur `tokio::sync::watch`,
//   il peut etre declenche plusieurs fois sans effet supplementaire, et
//   une tache qui s'abonne apres le declenchement le voit immediatement.
// - `WindowLifecycle` : machine a etats de la fenetre
//   (`Hidden | Visible | Minimized | Quitting`), possedee par le
//   collaborateur de fenetrage et passee par reference au chemin d'arret.

use tokio::sync::watch;

/// Emetteur du signal d'arret.
#[derive(Clone)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Declenche l'arret. Les appels suivants sont sans effet.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Nouvel abonne au signal.
    pub fn subscribe(&self) -> StopListener {
        StopListener { rx: self.tx.subscribe() }
    }
}

/// Cote recepteur du signal d'arret.
pub struct StopListener {
    rx: watch::Receiver<bool>,
}

impl StopListener {
    /// Se termine des que l'arret est declenche (immediatement s'il l'est deja).
    pub async fn stopped(&mut self) {
        // L'emetteur vit aussi longtemps que le moteur : une erreur signifie
        // qu'il a ete detruit, ce qui vaut arret.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Etat de la fenetre de presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Hidden,
    Visible,
    Minimized,
    Quitting,
}

/// Decision prise a la demande de fermeture de la fenetre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// La fenetre est masquee, l'application continue en arriere-plan.
    Hide,
    /// L'application se termine.
    Quit,
}

/// Machine a etats de la fenetre.
#[derive(Debug)]
pub struct WindowLifecycle {
    state: WindowState,
}

impl Default for WindowLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowLifecycle {
    /// Demarre masquee.
    pub fn new() -> Self {
        Self { state: WindowState::Hidden }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_quitting(&self) -> bool {
        self.state == WindowState::Quitting
    }

    /// Raccourci global : montre la fenetre si elle ne l'est pas, sinon la minimise.
    pub fn toggle(&mut self) -> WindowState {
        self.state = match self.state {
            WindowState::Visible => WindowState::Minimized,
            WindowState::Hidden | WindowState::Minimized => WindowState::Visible,
            WindowState::Quitting => WindowState::Quitting,
        };
        self.state
    }

    /// Masque la fenetre (par exemple apres une selection avec autoHide).
    pub fn hide(&mut self) {
        if self.state != WindowState::Quitting {
            self.state = WindowState::Hidden;
        }
    }

    /// Bouton de fermeture : une fenetre visible est masquee ; sinon
    /// (fermeture depuis le dock, ou deja en cours d'arret) l'application quitte.
    pub fn request_close(&mut self) -> CloseDecision {
        match self.state {
            WindowState::Visible => {
                self.state = WindowState::Hidden;
                CloseDecision::Hide
            }
            _ => {
                self.state = WindowState::Quitting;
                CloseDecision::Quit
            }
        }
    }

    /// Demande explicite d'arret. Etat terminal.
    pub fn quit(&mut self) {
        self.state = WindowState::Quitting;
    }
}
