//! Resource loading and management.
//!
//! This crate locates, caches and reference-counts the engine's resources:
//! - Meshes, shaders and textures addressed by URL
//! - Protocol-routed providers (built-in `kickjs://` resources and a URL fallback)
//! - Per-kind caches that tear resources down when the last reference is released
//! - Procedural primitive meshes and canned shader presets

mod cache;
mod decoder;
mod error;
mod manager;
mod registry;
mod resource;

pub mod mesh;
pub mod primitives;
pub mod provider;
pub mod shader;
pub mod texture;
pub mod url;

pub use cache::ResourceCache;
pub use decoder::{DecodeCallback, DecodedImage, DeferredImageDecoder, ImageDecoder};
pub use error::{ResourceError, ResourceResult};
pub use manager::ResourceManager;
pub use mesh::{Mesh, MeshData};
pub use provider::{Capability, ResourceProvider};
pub use registry::ProviderRegistry;
pub use resource::{Handle, LoadState, Resource, ResourceKind, handle};
pub use shader::{Shader, ShaderData, ShaderPreset};
pub use texture::{Filter, Texture, TextureConfig, TextureFormat};
