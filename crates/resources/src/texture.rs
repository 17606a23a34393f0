//! Texture resource and sampling configuration.

use tracing::debug;

use crate::error::{ResourceError, ResourceResult};
use crate::resource::{LoadState, Resource, ResourceKind};

/// Texture filtering mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// Pixel storage format. Only 8-bit RGBA is produced today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureFormat {
    #[default]
    Rgba8,
}

impl TextureFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// Sampling and storage settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureConfig {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub generate_mipmaps: bool,
    pub format: TextureFormat,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            generate_mipmaps: true,
            format: TextureFormat::Rgba8,
        }
    }
}

impl TextureConfig {
    /// Nearest filtering without mipmaps, used for tiny solid-color textures.
    pub fn nearest() -> Self {
        Self {
            min_filter: Filter::Nearest,
            mag_filter: Filter::Nearest,
            generate_mipmaps: false,
            format: TextureFormat::Rgba8,
        }
    }
}

/// A texture resource holding CPU-side pixel data.
#[derive(Debug, Default)]
pub struct Texture {
    config: TextureConfig,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    source_url: Option<String>,
    state: LoadState,
    destroyed: bool,
}

impl Texture {
    /// Create an empty texture.
    pub fn new(config: TextureConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Upload pixel data. `pixels` must hold `width * height` pixels.
    pub fn set_image_data(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        url: &str,
    ) -> ResourceResult<()> {
        let expected = width as usize * height as usize * self.config.format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(ResourceError::InvalidImageData {
                expected,
                actual: pixels.len(),
            });
        }
        debug!("Texture '{}' set to {}x{}", url, width, height);
        self.width = width;
        self.height = height;
        self.pixels = pixels;
        self.source_url = Some(url.to_string());
        self.state = LoadState::Ready;
        Ok(())
    }

    /// Fill with a 2x2 white placeholder while a real image loads.
    pub fn set_temporary_texture(&mut self) {
        self.width = 2;
        self.height = 2;
        self.pixels = vec![255; 2 * 2 * 4];
        self.source_url = None;
    }

    pub fn config(&self) -> &TextureConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels
            .get(offset..offset + 4)
            .and_then(|p| p.try_into().ok())
    }

    /// URL the current pixels came from.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Load progress.
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub(crate) fn set_load_state(&mut self, state: LoadState) {
        self.state = state;
    }

    /// True once the cache has torn this texture down.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Resource for Texture {
    const KIND: ResourceKind = ResourceKind::Texture;

    fn destroy(&mut self) {
        self.pixels = Vec::new();
        self.width = 0;
        self.height = 0;
        self.state = LoadState::Unloaded;
        self.destroyed = true;
    }
}
