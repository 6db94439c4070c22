// SmartClip - Module history
// Gestion de l'historique du presse-papiers en memoire
//
// Ce module gere l'historique des entrees de presse-papiers en memoire.
// Il est independant de la plateforme et du runtime asynchrone.
//
// # Sous-modules
// - `entry` : structure ClipboardEntry avec identifiant, type, tag et horodatage
// - `ring`  : liste bornee HistoryRing, plus recente en tete, sans verrou
// - `store` : HistoryStore, domaine d'exclusion mutuelle autour du ring,
//             declenche la sauvegarde asynchrone apres chaque mutation
//
// # Architecture
// Toutes les lectures coherentes et toutes les ecritures passent par le
// Mutex de HistoryStore. Le verrou est tenu le temps de la mutation en
// memoire seulement : la sauvegarde est postee apres sa liberation.

/// Structure de donnees d'une entree de presse-papiers.
pub mod entry;
/// Liste bornee plus-recente-en-tete, sans synchronisation.
pub mod ring;
/// Historique partage protege par un Mutex.
pub mod store;
