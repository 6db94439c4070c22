// SmartClip - Module clipboard
// Acces au presse-papiers du systeme, en lecture et en ecriture
//
// Sous-modules :
// - `port` : trait `ClipboardPort` et presse-papiers en memoire
// - `system` : implementation sur le presse-papiers du systeme (arboard)
// - `monitor` : pollers produisant un flux de valeurs par type de contenu
// - `guard` : filtrage des observations (echo, doublons, plafond dur)
// - `codec` : data-URI PNG et reduction des images trop grosses
// - `injector` : ecriture d'un element de l'historique dans le presse-papiers
//
// Le contenu n'est jamais journalise, seulement sa taille et son type.

/// Data-URI et conversion d'images.
pub mod codec;
/// Filtrage des observations.
pub mod guard;
/// Ecriture dans le presse-papiers.
pub mod injector;
/// Surveillance par sondage.
pub mod monitor;
/// Abstraction du presse-papiers.
pub mod port;
/// Presse-papiers du systeme.
pub mod system;
