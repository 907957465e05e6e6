//! Image inputs for multimodal models.
//!
//! An image source is a `data:image/...;base64,` URI, an `http(s)` URL or a
//! local file path. [`to_data_uri`] normalizes all three into a data URI and
//! [`base64_payload`] strips the prefix for the Ollama `images` field.

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client};

use crate::error::ImageError;

pub const SUPPORTED_FORMATS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

const URL_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

static DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/.+;base64,").expect("data URI pattern"));

pub fn supported_formats() -> &'static [&'static str] {
    &SUPPORTED_FORMATS
}

fn is_data_uri(source: &str) -> bool {
    DATA_URI.is_match(source)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Cheap syntactic check: data URI, URL, or an existing file with a
/// supported extension.
pub fn is_valid_image_source(source: &str) -> bool {
    if is_data_uri(source) || is_url(source) {
        return true;
    }
    let path = Path::new(source);
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_FORMATS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
}

/// Validate an image source and return it as a `data:<mime>;base64,` URI.
pub async fn to_data_uri(
    http: &Client,
    source: &str,
    max_size_mb: f64,
) -> Result<String, ImageError> {
    if is_data_uri(source) {
        // Decoded size estimate.
        let size_mb = source.len() as f64 * 3.0 / 4.0 / BYTES_PER_MB;
        check_size("Base64 image", size_mb, max_size_mb)?;
        return Ok(source.to_string());
    }

    let (data, mime) = if is_url(source) {
        fetch_url(http, source, max_size_mb).await?
    } else {
        read_file(source, max_size_mb).await?
    };

    check_size("Image data", data.len() as f64 / BYTES_PER_MB, max_size_mb)?;
    log::debug!("Encoded {} bytes of {mime}", data.len());
    Ok(format!("data:{mime};base64,{}", BASE64_STANDARD.encode(&data)))
}

/// The base64 part of a data URI; anything else is returned as is.
pub fn base64_payload(data_uri: &str) -> &str {
    match data_uri.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => data_uri,
    }
}

fn check_size(what: &'static str, size_mb: f64, max_mb: f64) -> Result<(), ImageError> {
    if size_mb > max_mb {
        return Err(ImageError::TooLarge {
            what,
            size_mb,
            max_mb,
        });
    }
    Ok(())
}

async fn fetch_url(
    http: &Client,
    url: &str,
    max_size_mb: f64,
) -> Result<(Vec<u8>, String), ImageError> {
    let response = http
        .get(url)
        .timeout(URL_FETCH_TIMEOUT)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| ImageError::Fetch(err.to_string()))?;

    let mime = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !mime.starts_with("image/") {
        return Err(ImageError::InvalidContentType(mime));
    }
    let mime = mime
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    if let Some(length) = response.content_length() {
        check_size("Image URL", length as f64 / BYTES_PER_MB, max_size_mb)?;
    }

    let data = response
        .bytes()
        .await
        .map_err(|err| ImageError::Fetch(err.to_string()))?;
    Ok((data.to_vec(), mime))
}

async fn read_file(source: &str, max_size_mb: f64) -> Result<(Vec<u8>, String), ImageError> {
    let metadata = match tokio::fs::metadata(source).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ImageError::NotFound(source.to_string()))
        }
        Err(err) => return Err(err.into()),
    };
    check_size("Image file", metadata.len() as f64 / BYTES_PER_MB, max_size_mb)?;

    let data = tokio::fs::read(source).await?;
    let format =
        sniff_format(&data).ok_or_else(|| ImageError::UnsupportedFormat(source.to_string()))?;
    Ok((data, format!("image/{format}")))
}

/// Identify an image by its magic bytes.
fn sniff_format(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpeg")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("gif")
    } else if data.starts_with(b"BM") {
        Some("bmp")
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}
