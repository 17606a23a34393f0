//! Host image decoding.
//!
//! The URL-fallback provider hands image URLs to an [`ImageDecoder`] and is
//! told about the result later through a callback, the way a browser image
//! element reports `onload`/`onerror`.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use kick_core::TaskQueue;
use tracing::debug;

use crate::error::{ResourceError, ResourceResult};

/// Decoded RGBA8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

/// Completion callback for [`ImageDecoder::decode`].
pub type DecodeCallback = Box<dyn FnOnce(ResourceResult<DecodedImage>)>;

/// The host's asynchronous image decoding facility.
pub trait ImageDecoder {
    /// Start decoding `url`. `on_complete` runs exactly once, possibly later.
    fn decode(&self, url: &str, on_complete: DecodeCallback);
}

/// Decoder that reads files or `data:` URLs on the task queue.
///
/// Relative paths are resolved against the configured asset root; a
/// `file://` prefix is stripped.
pub struct DeferredImageDecoder {
    queue: Rc<TaskQueue>,
    asset_root: PathBuf,
}

impl DeferredImageDecoder {
    pub fn new(queue: Rc<TaskQueue>, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            queue,
            asset_root: asset_root.into(),
        }
    }

    /// Decode immediately, bypassing the queue.
    pub fn decode_now(&self, url: &str) -> ResourceResult<DecodedImage> {
        decode_url(url, &self.asset_root)
    }
}

impl ImageDecoder for DeferredImageDecoder {
    fn decode(&self, url: &str, on_complete: DecodeCallback) {
        let url = url.to_string();
        let asset_root = self.asset_root.clone();
        self.queue.post(move || on_complete(decode_url(&url, &asset_root)));
    }
}

fn decode_url(url: &str, asset_root: &Path) -> ResourceResult<DecodedImage> {
    let bytes = read_source(url, asset_root)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    debug!("Decoded '{}' ({}x{})", short(url), width, height);
    Ok(DecodedImage {
        width,
        height,
        pixels: image.into_raw(),
    })
}

fn read_source(url: &str, asset_root: &Path) -> ResourceResult<Vec<u8>> {
    if let Some(rest) = url.strip_prefix("data:") {
        let (meta, payload) = rest.split_once(',').ok_or_else(|| decode_error(url, "data URL has no payload"))?;
        if !meta.ends_with(";base64") {
            return Err(decode_error(url, "only base64 data URLs are supported"));
        }
        return BASE64
            .decode(payload.trim())
            .map_err(|e| decode_error(url, e.to_string()));
    }
    let path = url.strip_prefix("file://").unwrap_or(url);
    let path = asset_root.join(path);
    if !path.exists() {
        return Err(decode_error(url, format!("{:?} does not exist", path)));
    }
    Ok(fs::read(path)?)
}

fn decode_error(url: &str, message: impl Into<String>) -> ResourceError {
    ResourceError::ImageDecode {
        url: short(url).to_string(),
        message: message.into(),
    }
}

// Keeps data URLs from flooding logs and error messages.
fn short(url: &str) -> &str {
    const MAX: usize = 64;
    if url.len() <= MAX {
        return url;
    }
    let mut end = MAX;
    while !url.is_char_boundary(end) {
        end -= 1;
    }
    &url[..end]
}
