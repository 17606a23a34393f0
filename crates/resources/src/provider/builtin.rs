//! Built-in resources under the `kickjs` protocol.
//!
//! | URL | Resource |
//! |-----|----------|
//! | `kickjs://mesh/triangle/` | single triangle |
//! | `kickjs://mesh/plane/` | 2x2 quad |
//! | `kickjs://mesh/uvsphere/?slices=20&stacks=10&radius=1.0` | UV sphere |
//! | `kickjs://mesh/cube/?length=1.0` | cube with the given edge length |
//! | `kickjs://shader/<phong\|unlit\|transparent_phong\|transparent_unlit\|error>/` | shader preset |
//! | `kickjs://texture/<black\|white\|gray>/` | 2x2 solid color |
//!
//! Mesh URLs may use either the `mesh` or the `meshdata` category. All query
//! parameters are optional.

use std::rc::Rc;
use std::time::Duration;

use kick_core::{ResourceConfig, TaskQueue};
use tracing::debug;

use super::ResourceProvider;
use crate::error::{ResourceError, ResourceResult};
use crate::mesh::{Mesh, MeshData};
use crate::primitives;
use crate::resource::{Handle, LoadState};
use crate::shader::{Shader, ShaderPreset};
use crate::texture::{Texture, TextureConfig};
use crate::url::ResourceUrl;

/// Protocol of the built-in provider.
pub const BUILTIN_PROTOCOL: &str = "kickjs";

/// Solid colors served under `kickjs://texture/<name>/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolidColor {
    Black,
    White,
    Gray,
}

impl SolidColor {
    /// Look a color up by its URL name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "black" => Some(SolidColor::Black),
            "white" => Some(SolidColor::White),
            "gray" => Some(SolidColor::Gray),
            _ => None,
        }
    }

    /// RGBA value.
    pub fn rgba(self) -> [u8; 4] {
        match self {
            SolidColor::Black => [0, 0, 0, 255],
            SolidColor::White => [255, 255, 255, 255],
            SolidColor::Gray => [127, 127, 127, 255],
        }
    }

    /// Pixels of a 2x2 image of this color.
    pub fn pixels(self) -> Vec<u8> {
        self.rgba().repeat(4)
    }
}

/// Provider for procedurally generated meshes, canned shaders and solid textures.
pub struct BuiltInResourceProvider {
    queue: Rc<TaskQueue>,
    latency: Option<Duration>,
}

impl BuiltInResourceProvider {
    /// Create the provider. Destination mesh loads are deferred on `queue`
    /// when the config asks for simulated latency.
    pub fn new(config: &ResourceConfig, queue: Rc<TaskQueue>) -> Self {
        Self {
            queue,
            latency: config.simulated_latency_ms.map(Duration::from_millis),
        }
    }

    // Ok(None) when the category is right but the name is unknown.
    fn mesh_data(url: &ResourceUrl<'_>) -> ResourceResult<Option<MeshData>> {
        expect_category(url, &["mesh", "meshdata"])?;
        let data = match url.name() {
            "triangle" => primitives::triangle(),
            "plane" => primitives::plane(),
            "uvsphere" => {
                let slices = count_param(url, "slices", primitives::DEFAULT_SPHERE_SLICES)?;
                let stacks = count_param(url, "stacks", primitives::DEFAULT_SPHERE_STACKS)?;
                let too_dense = primitives::sphere_vertex_count(slices, stacks)
                    .is_none_or(|count| count > primitives::MAX_SPHERE_VERTICES);
                if too_dense {
                    return Err(ResourceError::malformed(
                        url.as_str(),
                        format!(
                            "sphere of {slices}x{stacks} exceeds {} vertices",
                            primitives::MAX_SPHERE_VERTICES
                        ),
                    ));
                }
                let radius = url
                    .param_float("radius")?
                    .unwrap_or(primitives::DEFAULT_SPHERE_RADIUS);
                primitives::uv_sphere(slices, stacks, radius)
            }
            "cube" => {
                let length = url
                    .param_float("length")?
                    .unwrap_or(primitives::DEFAULT_CUBE_LENGTH);
                primitives::cube(length)
            }
            _ => return Ok(None),
        };
        Ok(Some(data))
    }

    fn shader_preset(url: &ResourceUrl<'_>) -> ResourceResult<Option<ShaderPreset>> {
        expect_category(url, &["shader"])?;
        Ok(ShaderPreset::from_name(url.name()))
    }

    fn solid_color(url: &ResourceUrl<'_>) -> ResourceResult<Option<SolidColor>> {
        expect_category(url, &["texture"])?;
        Ok(SolidColor::from_name(url.name()))
    }
}

impl ResourceProvider for BuiltInResourceProvider {
    fn protocol(&self) -> &str {
        BUILTIN_PROTOCOL
    }

    fn get_mesh_data(&self, url: &str, destination: &Handle<Mesh>) -> ResourceResult<()> {
        let parsed = ResourceUrl::parse(url);
        let data = Self::mesh_data(&parsed)?
            .ok_or_else(|| ResourceError::malformed(url, "no built-in mesh data with that name"))?;

        match self.latency {
            Some(delay) => {
                debug!("Deferring mesh data for '{}' by {:?}", url, delay);
                destination.borrow_mut().set_load_state(LoadState::Pending);
                let destination = Rc::clone(destination);
                self.queue.defer(delay, move || {
                    let mut mesh = destination.borrow_mut();
                    if mesh.is_destroyed() {
                        debug!("Dropping mesh data for destroyed mesh '{}'", mesh.name());
                        return;
                    }
                    mesh.set_mesh_data(data);
                });
            }
            None => destination.borrow_mut().set_mesh_data(data),
        }
        Ok(())
    }

    fn get_image_data(&self, url: &str, destination: &Handle<Texture>) -> ResourceResult<()> {
        let parsed = ResourceUrl::parse(url);
        let color = Self::solid_color(&parsed)?
            .ok_or_else(|| ResourceError::malformed(url, "no built-in texture with that name"))?;
        destination
            .borrow_mut()
            .set_image_data(2, 2, color.pixels(), url)
    }

    fn get_shader_data(&self, url: &str, destination: &Handle<Shader>) -> ResourceResult<()> {
        let parsed = ResourceUrl::parse(url);
        let preset = Self::shader_preset(&parsed)?
            .ok_or_else(|| ResourceError::malformed(url, "no built-in shader with that name"))?;
        let mut shader = destination.borrow_mut();
        shader.apply(preset.shader_data());
        shader.update_shader()
    }

    fn get_mesh(&self, url: &str) -> ResourceResult<Option<Mesh>> {
        let parsed = ResourceUrl::parse(url);
        Ok(Self::mesh_data(&parsed)?.map(|data| {
            let name = data.name.clone();
            Mesh::with_data(name, data)
        }))
    }

    fn get_shader(&self, url: &str) -> ResourceResult<Option<Shader>> {
        let parsed = ResourceUrl::parse(url);
        let Some(preset) = Self::shader_preset(&parsed)? else {
            return Ok(None);
        };
        let mut shader = Shader::new();
        shader.apply(preset.shader_data());
        shader.update_shader()?;
        Ok(Some(shader))
    }

    fn get_texture(&self, url: &str) -> ResourceResult<Option<Texture>> {
        let parsed = ResourceUrl::parse(url);
        let Some(color) = Self::solid_color(&parsed)? else {
            return Ok(None);
        };
        let mut texture = Texture::new(TextureConfig::nearest());
        texture.set_image_data(2, 2, color.pixels(), url)?;
        Ok(Some(texture))
    }
}

fn expect_category(url: &ResourceUrl<'_>, allowed: &[&str]) -> ResourceResult<()> {
    if allowed.contains(&url.category()) {
        Ok(())
    } else {
        Err(ResourceError::malformed(
            url.as_str(),
            format!(
                "built-in category '{}' is not one of {:?}",
                url.category(),
                allowed
            ),
        ))
    }
}

fn count_param(url: &ResourceUrl<'_>, key: &str, default: u32) -> ResourceResult<u32> {
    let Some(value) = url.param_int(key)? else {
        return Ok(default);
    };
    match u32::try_from(value) {
        Ok(count) if count <= primitives::MAX_SPHERE_SEGMENTS => Ok(count),
        Ok(_) => Err(ResourceError::malformed(
            url.as_str(),
            format!(
                "parameter '{key}' must be at most {}",
                primitives::MAX_SPHERE_SEGMENTS
            ),
        )),
        Err(_) => Err(ResourceError::malformed(
            url.as_str(),
            format!("parameter '{key}' must not be negative"),
        )),
    }
}
