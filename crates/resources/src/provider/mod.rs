//! Resource providers.
//!
//! A provider claims a URL prefix (its protocol) and knows how to produce
//! some kinds of resources for URLs under it. Each capability is a trait
//! method whose default implementation fails with
//! [`ResourceError::NotImplemented`], so a provider only overrides what it
//! actually supports and callers always get a typed answer.
//!
//! Two styles are supported:
//! - **factory** (`get_mesh`, `get_shader`, `get_texture`) returns a new
//!   resource, or `Ok(None)` if the provider has nothing for the URL;
//! - **destination** (`get_mesh_data`, `get_image_data`, `get_shader_data`)
//!   fills an existing resource, possibly later via the task queue.

mod builtin;
mod url;

pub use builtin::{BUILTIN_PROTOCOL, BuiltInResourceProvider, SolidColor};
pub use url::UrlResourceProvider;

use crate::error::{ResourceError, ResourceResult};
use crate::mesh::Mesh;
use crate::resource::Handle;
use crate::shader::Shader;
use crate::texture::Texture;

/// Operations a provider may support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    MeshData,
    ImageData,
    ShaderData,
    Mesh,
    Shader,
    Texture,
}

impl Capability {
    /// Name of the provider method behind this capability.
    pub fn method_name(self) -> &'static str {
        match self {
            Capability::MeshData => "get_mesh_data",
            Capability::ImageData => "get_image_data",
            Capability::ShaderData => "get_shader_data",
            Capability::Mesh => "get_mesh",
            Capability::Shader => "get_shader",
            Capability::Texture => "get_texture",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.method_name())
    }
}

/// Produces resources for URLs starting with [`ResourceProvider::protocol`].
pub trait ResourceProvider {
    /// URL prefix this provider answers for. The empty string matches every URL.
    fn protocol(&self) -> &str;

    /// Fill `destination` with mesh geometry.
    fn get_mesh_data(&self, _url: &str, _destination: &Handle<Mesh>) -> ResourceResult<()> {
        Err(not_implemented(self.protocol(), Capability::MeshData))
    }

    /// Fill `destination` with pixels.
    fn get_image_data(&self, _url: &str, _destination: &Handle<Texture>) -> ResourceResult<()> {
        Err(not_implemented(self.protocol(), Capability::ImageData))
    }

    /// Fill `destination` with shader source and render state.
    fn get_shader_data(&self, _url: &str, _destination: &Handle<Shader>) -> ResourceResult<()> {
        Err(not_implemented(self.protocol(), Capability::ShaderData))
    }

    /// Create a mesh.
    fn get_mesh(&self, _url: &str) -> ResourceResult<Option<Mesh>> {
        Err(not_implemented(self.protocol(), Capability::Mesh))
    }

    /// Create a shader.
    fn get_shader(&self, _url: &str) -> ResourceResult<Option<Shader>> {
        Err(not_implemented(self.protocol(), Capability::Shader))
    }

    /// Create a texture.
    fn get_texture(&self, _url: &str) -> ResourceResult<Option<Texture>> {
        Err(not_implemented(self.protocol(), Capability::Texture))
    }
}

/// Error for a provider that was selected but lacks `capability`.
pub fn not_implemented(protocol: &str, capability: Capability) -> ResourceError {
    ResourceError::NotImplemented {
        protocol: protocol.to_string(),
        capability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::handle;

    struct Bare;

    impl ResourceProvider for Bare {
        fn protocol(&self) -> &str {
            "bare"
        }
    }

    #[test]
    fn test_default_capabilities_fail_typed() {
        let provider = Bare;
        let err = provider.get_mesh("bare://x").unwrap_err();
        assert!(matches!(
            err,
            ResourceError::NotImplemented {
                capability: Capability::Mesh,
                ..
            }
        ));

        let mesh = handle(Mesh::new("x"));
        let err = provider.get_mesh_data("bare://x", &mesh).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider for protocol 'bare' does not implement get_mesh_data"
        );
    }
}
