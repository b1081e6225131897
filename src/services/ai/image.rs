use anyhow::Context;
use base64::Engine;

use super::InlineImage;

/// Identifies the image formats the vision models accept by magic number.
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Builds an inline image from raw upload bytes, preferring the sniffed type
/// over a declared `image/*` content type.
pub fn from_upload(data: Vec<u8>, declared: Option<&str>) -> anyhow::Result<InlineImage> {
    anyhow::ensure!(!data.is_empty(), "uploaded file is empty");

    let mime_type = match (sniff_mime(&data), declared) {
        (Some(sniffed), _) => sniffed.to_string(),
        (None, Some(declared)) if declared.starts_with("image/") => declared.to_string(),
        _ => anyhow::bail!("uploaded file is not a supported image"),
    };

    Ok(InlineImage { mime_type, data })
}

/// Decodes base64 image data, with or without a `data:<mime>;base64,` prefix.
pub fn decode_data_url(encoded: &str) -> anyhow::Result<InlineImage> {
    let (header, payload) = match encoded.split_once(',') {
        Some((header, payload)) => (Some(header), payload),
        None => (None, encoded),
    };

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("image data is not valid base64")?;

    let declared = header
        .and_then(|h| h.strip_prefix("data:"))
        .and_then(|h| h.split(';').next())
        .filter(|m| !m.is_empty());

    from_upload(data, declared)
}
