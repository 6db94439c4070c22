// SmartClip - Module config
// Configuration utilisateur et registre des tags
//
// Ce module gere la configuration persistee dans config.json, situee
// dans le repertoire de configuration utilisateur (voir storage::files).
//
// # Sous-modules
// - `settings` : structure Config (maxHistory, tags, autoHide), valeurs
//                par defaut et validation de la borne maxHistory
// - `store`    : ConfigStore, Mutex de la configuration et sauvegarde
//                asynchrone apres chaque mutation
// - `tags`     : TagRegistry, CRUD des tags et suppression en cascade
//                des entrees de l'historique
//
// # Utilisation
// ```rust,ignore
// let registry = TagRegistry::new(config_store, history_store);
// let id = registry.add_tag("travail", "#4A9EFF")?;
// ```

/// Structure de configuration et valeurs par defaut.
pub mod settings;
/// Configuration partagee protegee par un Mutex.
pub mod store;
/// Registre des tags et effets en cascade.
pub mod tags;
