// SmartClip - Presse-papiers du systeme
// Implementation de ClipboardPort au-dessus de `arboard`.
//
// Une connexion `arboard::Clipboard` est ouverte pour chaque operation
// et refermee aussitot. La construction verifie seulement qu'une
// connexion est possible.
//
// arboard expose les images en RGBA brut ; le moteur manipule du PNG.
// La conversion se fait ici, dans les deux sens. Le poller relit la
// meme image a chaque periode : le dernier PNG produit est garde avec
// l'empreinte des pixels source et reutilise tant qu'ils ne changent
// pas.

use crate::clipboard::codec::{png_to_rgba, rgba_to_png};
use crate::clipboard::port::ClipboardPort;
use crate::error::{ScError, ScResult};
use crate::history::entry::EntryKind;
use arboard::{Clipboard, ImageData};
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

struct EncodedImage {
    width: u32,
    height: u32,
    digest: u64,
    png: Vec<u8>,
}

/// Dernier couple pixels RGBA -> PNG.
#[derive(Default)]
struct PngCache {
    last: Option<EncodedImage>,
}

fn digest(rgba: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    rgba.hash(&mut hasher);
    hasher.finish()
}

impl PngCache {
    fn encode(&mut self, width: u32, height: u32, rgba: &[u8]) -> ScResult<Vec<u8>> {
        let digest = digest(rgba);
        if let Some(last) = &self.last {
            if last.width == width && last.height == height && last.digest == digest {
                return Ok(last.png.clone());
            }
        }
        let png = rgba_to_png(width, height, rgba.to_vec())?;
        debug!(width, height, bytes = png.len(), "clipboard image encoded");
        self.last = Some(EncodedImage {
            width,
            height,
            digest,
            png: png.clone(),
        });
        Ok(png)
    }
}

/// Presse-papiers de la session graphique courante.
pub struct SystemClipboard {
    cache: Mutex<PngCache>,
}

fn open() -> ScResult<Clipboard> {
    Clipboard::new().map_err(|e| ScError::Clipboard(format!("failed to open clipboard: {}", e)))
}

fn clipboard_error(action: &str, e: arboard::Error) -> ScError {
    ScError::Clipboard(format!("failed to {}: {}", action, e))
}

impl SystemClipboard {
    /// # Errors
    /// `Clipboard` si aucun presse-papiers n'est accessible (pas de
    /// session graphique par exemple).
    pub fn new() -> ScResult<Self> {
        open()?;
        Ok(Self {
            cache: Mutex::new(PngCache::default()),
        })
    }
}

impl ClipboardPort for SystemClipboard {
    fn read(&self, kind: EntryKind) -> ScResult<Option<Vec<u8>>> {
        let mut cb = open()?;
        match kind {
            EntryKind::Text => match cb.get_text() {
                Ok(text) => Ok(Some(text.into_bytes())),
                Err(arboard::Error::ContentNotAvailable) => Ok(None),
                Err(e) => Err(clipboard_error("read text", e)),
            },
            EntryKind::Image => match cb.get_image() {
                Ok(img) => {
                    let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
                    let png = cache.encode(img.width as u32, img.height as u32, &img.bytes)?;
                    Ok(Some(png))
                }
                Err(arboard::Error::ContentNotAvailable) => Ok(None),
                Err(e) => Err(clipboard_error("read image", e)),
            },
        }
    }

    fn write(&self, kind: EntryKind, payload: &[u8]) -> ScResult<()> {
        let mut cb = open()?;
        match kind {
            EntryKind::Text => cb
                .set_text(String::from_utf8_lossy(payload).into_owned())
                .map_err(|e| clipboard_error("write text", e)),
            EntryKind::Image => {
                let (width, height, rgba) = png_to_rgba(payload)?;
                cb.set_image(ImageData {
                    width: width as usize,
                    height: height as usize,
                    bytes: Cow::Owned(rgba),
                })
                .map_err(|e| clipboard_error("write image", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

    fn pixels(seed: u8) -> Vec<u8> {
        (0..4 * 4 * 4).map(|i| (i as u8).wrapping_mul(seed)).collect()
    }

    #[test]
    fn test_same_pixels_reuse_previous_png() {
        let mut cache = PngCache::default();
        let first = cache.encode(4, 4, &pixels(3)).unwrap();
        assert!(first.starts_with(PNG_SIGNATURE));

        // Un second encodage rendrait un vrai PNG, pas ce marqueur.
        if let Some(last) = cache.last.as_mut() {
            last.png = b"cached".to_vec();
        }
        assert_eq!(cache.encode(4, 4, &pixels(3)).unwrap(), b"cached");
    }

    #[test]
    fn test_changed_pixels_or_size_are_reencoded() {
        let mut cache = PngCache::default();
        cache.encode(4, 4, &pixels(3)).unwrap();
        if let Some(last) = cache.last.as_mut() {
            last.png = b"cached".to_vec();
        }

        let other = cache.encode(4, 4, &pixels(5)).unwrap();
        assert!(other.starts_with(PNG_SIGNATURE));
        assert_eq!(png_to_rgba(&other).unwrap(), (4, 4, pixels(5)));

        // Memes octets, autres dimensions.
        let reshaped = cache.encode(8, 2, &pixels(5)).unwrap();
        assert_eq!(png_to_rgba(&reshaped).unwrap(), (8, 2, pixels(5)));
    }

    #[test]
    fn test_failed_encoding_keeps_previous_entry() {
        let mut cache = PngCache::default();
        let png = cache.encode(4, 4, &pixels(3)).unwrap();
        assert!(cache.encode(4, 4, &[1, 2, 3]).is_err());
        assert_eq!(cache.encode(4, 4, &pixels(3)).unwrap(), png);
    }
}
