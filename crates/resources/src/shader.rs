//! Shader sources, render state and the shader resource.
//!
//! Shaders are kept as GLSL source plus blend state. Compilation belongs to
//! the renderer; [`Shader::update_shader`] only checks that both stages are
//! present and bumps a revision so renderers can notice the change.

use tracing::debug;

use crate::error::{ResourceError, ResourceResult};
use crate::resource::{Resource, ResourceKind};

/// Render order for opaque geometry.
pub const RENDER_ORDER_OPAQUE: i32 = 1000;
/// Render order for blended geometry, drawn after opaque.
pub const RENDER_ORDER_TRANSPARENT: i32 = 2000;

/// Shader source bundle and render state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderData {
    /// GLSL vertex stage
    pub vertex_source: String,
    /// GLSL fragment stage
    pub fragment_source: String,
    /// Alpha blending enabled
    pub blend: bool,
    /// Depth writes enabled
    pub depth_mask: bool,
    /// Sort key; lower draws first
    pub render_order: i32,
}

/// Shader presets served under `kickjs://shader/<name>/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderPreset {
    Phong,
    Unlit,
    TransparentPhong,
    TransparentUnlit,
    Error,
}

impl ShaderPreset {
    /// All presets.
    pub const ALL: [ShaderPreset; 5] = [
        ShaderPreset::Phong,
        ShaderPreset::Unlit,
        ShaderPreset::TransparentPhong,
        ShaderPreset::TransparentUnlit,
        ShaderPreset::Error,
    ];

    /// Look a preset up by its URL name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Name used in URLs.
    pub fn name(self) -> &'static str {
        match self {
            ShaderPreset::Phong => "phong",
            ShaderPreset::Unlit => "unlit",
            ShaderPreset::TransparentPhong => "transparent_phong",
            ShaderPreset::TransparentUnlit => "transparent_unlit",
            ShaderPreset::Error => "error",
        }
    }

    fn sources(self) -> (&'static str, &'static str) {
        match self {
            ShaderPreset::Phong => (
                include_str!("../shaders/phong.vert"),
                include_str!("../shaders/phong.frag"),
            ),
            ShaderPreset::Unlit => (
                include_str!("../shaders/unlit.vert"),
                include_str!("../shaders/unlit.frag"),
            ),
            ShaderPreset::TransparentPhong => (
                include_str!("../shaders/transparent_phong.vert"),
                include_str!("../shaders/transparent_phong.frag"),
            ),
            ShaderPreset::TransparentUnlit => (
                include_str!("../shaders/transparent_unlit.vert"),
                include_str!("../shaders/transparent_unlit.frag"),
            ),
            ShaderPreset::Error => (
                include_str!("../shaders/error.vert"),
                include_str!("../shaders/error.frag"),
            ),
        }
    }

    /// Whether the preset blends.
    pub fn is_transparent(self) -> bool {
        matches!(
            self,
            ShaderPreset::TransparentPhong | ShaderPreset::TransparentUnlit
        )
    }

    /// Source bundle and render state for this preset.
    pub fn shader_data(self) -> ShaderData {
        let (vertex_source, fragment_source) = self.sources();
        let transparent = self.is_transparent();
        ShaderData {
            vertex_source: vertex_source.to_string(),
            fragment_source: fragment_source.to_string(),
            blend: transparent,
            depth_mask: !transparent,
            render_order: if transparent {
                RENDER_ORDER_TRANSPARENT
            } else {
                RENDER_ORDER_OPAQUE
            },
        }
    }
}

/// A shader resource.
#[derive(Debug, Default)]
pub struct Shader {
    data: Option<ShaderData>,
    revision: u32,
    destroyed: bool,
}

impl Shader {
    /// Create a shader with no source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source and render state, if assigned.
    pub fn shader_data(&self) -> Option<&ShaderData> {
        self.data.as_ref()
    }

    /// Assign source and render state. Call [`Shader::update_shader`] afterwards.
    pub fn apply(&mut self, data: ShaderData) {
        self.data = Some(data);
    }

    /// Validate the assigned source and publish it as a new revision.
    pub fn update_shader(&mut self) -> ResourceResult<()> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| ResourceError::InvalidShader("no source assigned".into()))?;
        if data.vertex_source.trim().is_empty() {
            return Err(ResourceError::InvalidShader("empty vertex source".into()));
        }
        if data.fragment_source.trim().is_empty() {
            return Err(ResourceError::InvalidShader("empty fragment source".into()));
        }
        self.revision += 1;
        debug!("Shader updated to revision {}", self.revision);
        Ok(())
    }

    /// Number of successful updates.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// True once the cache has torn this shader down.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Resource for Shader {
    const KIND: ResourceKind = ResourceKind::Shader;

    fn destroy(&mut self) {
        self.data = None;
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ShaderPreset::ALL {
            assert_eq!(ShaderPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(ShaderPreset::from_name("toon"), None);
    }

    #[test]
    fn test_transparent_presets_blend() {
        let data = ShaderPreset::TransparentUnlit.shader_data();
        assert!(data.blend);
        assert!(!data.depth_mask);
        assert_eq!(data.render_order, RENDER_ORDER_TRANSPARENT);

        let data = ShaderPreset::Phong.shader_data();
        assert!(!data.blend);
        assert!(data.depth_mask);
        assert_eq!(data.render_order, RENDER_ORDER_OPAQUE);
    }

    #[test]
    fn test_every_preset_has_both_stages() {
        for preset in ShaderPreset::ALL {
            let data = preset.shader_data();
            assert!(data.vertex_source.contains("gl_Position"), "{:?}", preset);
            assert!(data.fragment_source.contains("gl_FragColor"), "{:?}", preset);
        }
    }

    #[test]
    fn test_update_requires_source() {
        let mut shader = Shader::new();
        assert!(matches!(
            shader.update_shader(),
            Err(ResourceError::InvalidShader(_))
        ));

        shader.apply(ShaderPreset::Error.shader_data());
        shader.update_shader().unwrap();
        assert_eq!(shader.revision(), 1);
    }

    #[test]
    fn test_update_rejects_empty_stage() {
        let mut shader = Shader::new();
        let mut data = ShaderPreset::Unlit.shader_data();
        data.fragment_source.clear();
        shader.apply(data);
        assert!(shader.update_shader().is_err());
        assert_eq!(shader.revision(), 0);
    }
}
