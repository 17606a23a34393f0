//! Resource manager: one provider registry and a cache per resource kind.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use kick_core::{ResourceConfig, TaskQueue};
//! use kick_resources::ResourceManager;
//!
//! let queue = Rc::new(TaskQueue::new());
//! let mut resources = ResourceManager::new(&ResourceConfig::default(), queue);
//!
//! let cube = resources.get_mesh("kickjs://mesh/cube/?length=2.0")?.unwrap();
//! let again = resources.get_mesh("kickjs://mesh/cube/?length=2.0")?.unwrap();
//! assert!(Rc::ptr_eq(&cube, &again));
//!
//! resources.release("kickjs://mesh/cube/?length=2.0");
//! resources.release("kickjs://mesh/cube/?length=2.0");
//! assert!(cube.borrow().is_destroyed());
//! # Ok::<(), kick_resources::ResourceError>(())
//! ```

use std::rc::Rc;

use kick_core::{ResourceConfig, TaskQueue};
use tracing::debug;

use crate::cache::ResourceCache;
use crate::decoder::{DeferredImageDecoder, ImageDecoder};
use crate::error::ResourceResult;
use crate::mesh::Mesh;
use crate::provider::{BuiltInResourceProvider, ResourceProvider, UrlResourceProvider};
use crate::registry::ProviderRegistry;
use crate::resource::{Handle, Resource, handle};
use crate::shader::Shader;
use crate::texture::Texture;

/// Allocates and releases meshes, shaders and textures by URL.
///
/// Factory-style getters are cache-mediated and reference-counted; every
/// successful `get_*` must be balanced by one [`ResourceManager::release`].
/// Destination-style loaders bypass the cache.
pub struct ResourceManager {
    registry: ProviderRegistry,
    meshes: ResourceCache<Mesh>,
    shaders: ResourceCache<Shader>,
    textures: ResourceCache<Texture>,
}

impl ResourceManager {
    /// Create a manager with the default providers, decoding images from
    /// `config.asset_root` on `queue`.
    pub fn new(config: &ResourceConfig, queue: Rc<TaskQueue>) -> Self {
        let decoder = Rc::new(DeferredImageDecoder::new(
            queue.clone(),
            config.asset_root.clone(),
        ));
        Self::with_decoder(config, queue, decoder)
    }

    /// Create a manager with the default providers and a host-supplied decoder.
    ///
    /// The URL fallback is registered first so that it is consulted last.
    pub fn with_decoder(
        config: &ResourceConfig,
        queue: Rc<TaskQueue>,
        decoder: Rc<dyn ImageDecoder>,
    ) -> Self {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(UrlResourceProvider::new(decoder)));
        registry.register(Box::new(BuiltInResourceProvider::new(config, queue)));
        Self::with_registry(registry)
    }

    /// Create a manager over an explicit provider table.
    pub fn with_registry(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            meshes: ResourceCache::new(),
            shaders: ResourceCache::new(),
            textures: ResourceCache::new(),
        }
    }

    /// Add a provider that takes precedence over all existing ones.
    pub fn register_provider(&mut self, provider: Box<dyn ResourceProvider>) {
        self.registry.register(provider);
    }

    /// Get a shared mesh, creating it on first use.
    ///
    /// `Ok(None)` if no provider has a mesh for `url`.
    pub fn get_mesh(&mut self, url: &str) -> ResourceResult<Option<Handle<Mesh>>> {
        get_or_create(&mut self.meshes, &self.registry, url, |p, url| {
            p.get_mesh(url)
        })
    }

    /// Get a shared shader, creating it on first use.
    pub fn get_shader(&mut self, url: &str) -> ResourceResult<Option<Handle<Shader>>> {
        get_or_create(&mut self.shaders, &self.registry, url, |p, url| {
            p.get_shader(url)
        })
    }

    /// Get a shared texture, creating it on first use.
    pub fn get_texture(&mut self, url: &str) -> ResourceResult<Option<Handle<Texture>>> {
        get_or_create(&mut self.textures, &self.registry, url, |p, url| {
            p.get_texture(url)
        })
    }

    /// Load mesh geometry into an existing mesh. Not reference-counted.
    pub fn get_mesh_data(&self, url: &str, destination: &Handle<Mesh>) -> ResourceResult<()> {
        self.registry
            .populate(url, |p, url| p.get_mesh_data(url, destination))
    }

    /// Load pixels into an existing texture. Not reference-counted.
    pub fn get_image_data(&self, url: &str, destination: &Handle<Texture>) -> ResourceResult<()> {
        self.registry
            .populate(url, |p, url| p.get_image_data(url, destination))
    }

    /// Load shader source into an existing shader. Not reference-counted.
    pub fn get_shader_data(&self, url: &str, destination: &Handle<Shader>) -> ResourceResult<()> {
        self.registry
            .populate(url, |p, url| p.get_shader_data(url, destination))
    }

    /// Drop one reference to `url` in every cache.
    ///
    /// The resource is destroyed when its last reference goes. Unknown URLs
    /// are ignored.
    pub fn release(&mut self, url: &str) {
        let released = self.meshes.release(url)
            | self.shaders.release(url)
            | self.textures.release(url);
        if !released {
            debug!("Release of '{}' matched no cached resource", url);
        }
    }

    /// Provider table.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn mesh_cache(&self) -> &ResourceCache<Mesh> {
        &self.meshes
    }

    pub fn shader_cache(&self) -> &ResourceCache<Shader> {
        &self.shaders
    }

    pub fn texture_cache(&self) -> &ResourceCache<Texture> {
        &self.textures
    }
}

fn get_or_create<R: Resource>(
    cache: &mut ResourceCache<R>,
    registry: &ProviderRegistry,
    url: &str,
    produce: impl FnOnce(&dyn ResourceProvider, &str) -> ResourceResult<Option<R>>,
) -> ResourceResult<Option<Handle<R>>> {
    if let Some(resource) = cache.try_get(url) {
        return Ok(Some(resource));
    }
    let Some(resource) = registry.create(url, produce)? else {
        debug!("No {} found for '{}'", R::KIND, url);
        return Ok(None);
    };
    let resource = handle(resource);
    cache.insert(url, Rc::clone(&resource));
    Ok(Some(resource))
}
