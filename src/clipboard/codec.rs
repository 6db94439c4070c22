// SmartClip - Encodage des images en data-URI
//
// Les images sont manipulees en PNG et stockees sous la forme
// `data:image/png;base64,<payload>`.
//
// # Reduction
// `fit_data_uri` garantit qu'une image stockee ne depasse pas le plafond
// souple. L'image est d'abord redimensionnee (decodage PNG, reduction
// proportionnelle, re-encodage) en quelques passes. Si le PNG ne peut
// pas etre decode ou reste trop gros, le data-URI est tronque au
// plafond : le resultat peut alors etre une image invalide.

use crate::constants::IMAGE_DATA_URI_PREFIX;
use crate::error::{ScError, ScResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use tracing::{debug, warn};

/// Nombre max de passes de redimensionnement.
const MAX_SHRINK_PASSES: usize = 4;

/// Facteur applique entre deux passes infructueuses.
const SHRINK_STEP: f64 = 0.75;

/// Encode des octets PNG en data-URI.
pub fn encode_data_uri(png: &[u8]) -> String {
    let mut uri = String::with_capacity(IMAGE_DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
    uri.push_str(IMAGE_DATA_URI_PREFIX);
    STANDARD.encode_string(png, &mut uri);
    uri
}

/// Longueur du data-URI pour `len` octets, sans l'encoder.
pub fn encoded_len(len: usize) -> usize {
    IMAGE_DATA_URI_PREFIX.len() + len.div_ceil(3) * 4
}

/// Retourne true si le contenu est une image en data-URI.
pub fn is_image_data_uri(content: &str) -> bool {
    content.starts_with(IMAGE_DATA_URI_PREFIX)
}

/// Decode un data-URI PNG en octets.
///
/// # Errors
/// - `InvalidArgument` si le prefixe est absent ou le payload vide
/// - `DecodeFailure` si le base64 est invalide
pub fn decode_data_uri(content: &str) -> ScResult<Vec<u8>> {
    let payload = content
        .strip_prefix(IMAGE_DATA_URI_PREFIX)
        .ok_or_else(|| ScError::InvalidArgument("not a PNG data-URI".into()))?;
    if payload.is_empty() {
        return Err(ScError::InvalidArgument("empty data-URI payload".into()));
    }
    STANDARD
        .decode(payload)
        .map_err(|e| ScError::DecodeFailure(format!("failed to decode image: {}", e)))
}

/// Encode une image PNG en data-URI d'au plus `cap` octets.
pub fn fit_data_uri(png: &[u8], cap: usize) -> String {
    let uri = encode_data_uri(png);
    if uri.len() <= cap {
        return uri;
    }
    if let Some(shrunk) = downscale(png, cap) {
        debug!(from = uri.len(), to = shrunk.len(), "image downscaled");
        return shrunk;
    }
    warn!(size = uri.len(), cap, "image could not be downscaled, truncating");
    let mut truncated = uri;
    truncated.truncate(cap);
    truncated
}

fn downscale(png: &[u8], cap: usize) -> Option<String> {
    let img = image::load_from_memory_with_format(png, ImageFormat::Png).ok()?;
    let mut scale = (cap as f64 / encoded_len(png.len()) as f64).sqrt();
    for _ in 0..MAX_SHRINK_PASSES {
        let width = ((img.width() as f64) * scale).max(1.0) as u32;
        let height = ((img.height() as f64) * scale).max(1.0) as u32;
        let resized = img.resize(width, height, FilterType::Triangle);
        let mut buf = Cursor::new(Vec::new());
        resized.write_to(&mut buf, ImageFormat::Png).ok()?;
        let uri = encode_data_uri(buf.get_ref());
        if uri.len() <= cap {
            return Some(uri);
        }
        scale *= SHRINK_STEP;
    }
    None
}

/// Encode une image RGBA brute en PNG.
pub fn rgba_to_png(width: u32, height: u32, rgba: Vec<u8>) -> ScResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| ScError::DecodeFailure("RGBA buffer does not match dimensions".into()))?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| ScError::DecodeFailure(format!("failed to encode PNG: {}", e)))?;
    Ok(buf.into_inner())
}

/// Decode un PNG en image RGBA brute (largeur, hauteur, pixels).
pub fn png_to_rgba(png: &[u8]) -> ScResult<(u32, u32, Vec<u8>)> {
    let img = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| ScError::DecodeFailure(format!("failed to decode PNG: {}", e)))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    Ok((w, h, img.into_raw()))
}
