// SmartClip - Ecriture dans le presse-papiers
// Chemin de SaveToClipboard : remettre un element de l'historique dans
// le presse-papiers du systeme.
//
// Le contenu est du texte brut ou une image en data-URI ; l'image est
// decodee en PNG avant toute ecriture, si bien qu'un data-URI invalide
// n'arme jamais le drapeau skip-next.
//
// Le poller ne signale que les changements : si le presse-papiers
// contient deja exactement cette valeur, l'ecriture n'aurait pas
// d'echo et laisserait le drapeau arme. Dans ce cas rien n'est ecrit.
//
// Sinon le drapeau est arme juste avant l'ecriture et desarme si
// l'ecriture echoue.

use crate::clipboard::codec::{decode_data_uri, is_image_data_uri};
use crate::clipboard::guard::SkipNext;
use crate::clipboard::port::ClipboardPort;
use crate::error::ScResult;
use crate::history::entry::EntryKind;
use tracing::debug;

/// Ecrit un contenu d'historique dans le presse-papiers.
///
/// # Errors
/// - `InvalidArgument` / `DecodeFailure` pour un data-URI invalide
/// - `Clipboard` si l'ecriture echoue
pub fn write_content(port: &dyn ClipboardPort, skip: &SkipNext, content: &str) -> ScResult<()> {
    let (kind, payload) = if is_image_data_uri(content) {
        (EntryKind::Image, decode_data_uri(content)?)
    } else {
        (EntryKind::Text, content.as_bytes().to_vec())
    };

    if matches!(port.read(kind), Ok(Some(ref current)) if *current == payload) {
        debug!(kind = kind.as_str(), "clipboard already holds this value");
        return Ok(());
    }

    skip.arm();
    if let Err(e) = port.write(kind, &payload) {
        skip.disarm();
        return Err(e);
    }
    debug!(kind = kind.as_str(), size = payload.len(), "clipboard written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::codec::encode_data_uri;
    use crate::clipboard::port::MemoryClipboard;
    use crate::error::ScError;

    struct BrokenClipboard;

    impl ClipboardPort for BrokenClipboard {
        fn read(&self, _kind: EntryKind) -> ScResult<Option<Vec<u8>>> {
            Ok(None)
        }

        fn write(&self, _kind: EntryKind, _payload: &[u8]) -> ScResult<()> {
            Err(ScError::Clipboard("unavailable".into()))
        }
    }

    #[test]
    fn test_write_text_arms_skip() {
        let cb = MemoryClipboard::new();
        let skip = SkipNext::new();
        write_content(&cb, &skip, "hello").unwrap();
        assert!(skip.is_armed());
        assert_eq!(cb.writes(), vec![(EntryKind::Text, b"hello".to_vec())]);
    }

    #[test]
    fn test_write_image_decodes_data_uri() {
        let cb = MemoryClipboard::new();
        let skip = SkipNext::new();
        write_content(&cb, &skip, &encode_data_uri(&[9, 8, 7])).unwrap();
        assert_eq!(cb.read(EntryKind::Image).unwrap(), Some(vec![9, 8, 7]));
        assert_eq!(cb.read(EntryKind::Text).unwrap(), None);
    }

    #[test]
    fn test_same_value_is_not_rewritten() {
        let cb = MemoryClipboard::new();
        cb.copy_text("same");
        let skip = SkipNext::new();
        write_content(&cb, &skip, "same").unwrap();
        assert!(!skip.is_armed());
        assert!(cb.writes().is_empty());
    }

    #[test]
    fn test_invalid_data_uri_leaves_skip_disarmed() {
        let cb = MemoryClipboard::new();
        let skip = SkipNext::new();
        let err = write_content(&cb, &skip, "data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, ScError::DecodeFailure(_)));
        assert!(!skip.is_armed());
        assert!(cb.writes().is_empty());
    }

    #[test]
    fn test_failed_write_disarms_skip() {
        let skip = SkipNext::new();
        let err = write_content(&BrokenClipboard, &skip, "x").unwrap_err();
        assert!(matches!(err, ScError::Clipboard(_)));
        assert!(!skip.is_armed());
    }
}
