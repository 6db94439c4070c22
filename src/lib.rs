// SmartClip - Arbre de modules (crate library)
//
// Point d'entree de la crate library. Le binaire et les tests
// d'integration passent par ces modules.
//
// # Modules
// - `app`       : `Engine`, facade de l'API et cablage des taches
// - `clipboard` : acces au presse-papiers, pollers, filtrage, ecriture
// - `config`    : configuration utilisateur et registre des tags
// - `constants` : plafonds, periodes, noms de fichiers
// - `error`     : types d'erreur centralises (ScError, ScResult)
// - `events`    : notifications vers l'interface
// - `history`   : entrees et historique partage
// - `lifecycle` : signal d'arret et etats de la fenetre
// - `storage`   : documents JSON et passerelle de persistance
// - `sweeper`   : purge periodique des entrees expirees
// - `watcher`   : boucle presse-papiers -> historique

/// Orchestrateur principal.
pub mod app;
/// Acces au presse-papiers.
pub mod clipboard;
/// Configuration utilisateur et tags.
pub mod config;
/// Constantes globales.
pub mod constants;
/// Types d'erreur centralises.
pub mod error;
/// Notifications vers l'interface.
pub mod events;
/// Historique du presse-papiers.
pub mod history;
/// Cycle de vie du processus et de la fenetre.
pub mod lifecycle;
/// Persistance sur disque.
pub mod storage;
/// Purge de retention.
pub mod sweeper;
/// Boucle de surveillance.
pub mod watcher;
