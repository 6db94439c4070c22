// SmartClip - Module storage
// Persistance de la configuration et de l'historique sur disque
//
// Ce module gere la sauvegarde et le chargement des deux documents JSON
// (config.json, history.json) dans le repertoire de configuration de
// l'utilisateur.
//
// # Sous-modules
// - `format`  : schema JSON des documents, conversion entree <-> enregistrement
// - `files`   : emplacement des fichiers, chargement tolerant aux erreurs,
//               ecriture atomique (temp + rename)
// - `gateway` : PersistenceGateway, file d'ecriture unique alimentee par
//               les mutations (sauvegarde "fire-and-forget")
//
// # Politique d'erreur
// La persistance est "best effort" : aucune erreur de lecture ou
// d'ecriture ne remonte a l'operation qui l'a declenchee. Elles sont
// journalisees via `tracing`.

/// Lecture/ecriture des fichiers de donnees.
pub mod files;
/// Schema JSON des documents persistes.
pub mod format;
/// File d'ecriture asynchrone unique.
pub mod gateway;
