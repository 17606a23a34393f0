//! Mesh geometry and the mesh resource.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::resource::{LoadState, Resource, ResourceKind};

/// Indexed triangle geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Name used in logs
    pub name: String,
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Vertex normals; empty when the source had none
    pub normals: Vec<Vec3>,
    /// Texture coordinates; empty when the source had none
    pub uvs: Vec<Vec2>,
    /// Triangle list indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if there is one normal per vertex.
    pub fn has_normals(&self) -> bool {
        !self.positions.is_empty() && self.normals.len() == self.positions.len()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Replace the normals with area-weighted face normals.
    ///
    /// Vertices not referenced by any triangle get `Vec3::Y`.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= normals.len() || b >= normals.len() || c >= normals.len() {
                continue;
            }
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }
}

/// A mesh resource: geometry that may arrive after the mesh is created.
#[derive(Debug, Default)]
pub struct Mesh {
    name: String,
    data: Option<MeshData>,
    state: LoadState,
    destroyed: bool,
}

impl Mesh {
    /// Create an empty mesh waiting for data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a mesh that already has its data.
    pub fn with_data(name: impl Into<String>, data: MeshData) -> Self {
        let mut mesh = Self::new(name);
        mesh.set_mesh_data(data);
        mesh
    }

    /// Mesh name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry, if loaded.
    pub fn mesh_data(&self) -> Option<&MeshData> {
        self.data.as_ref()
    }

    /// Mutable geometry, if loaded.
    pub fn mesh_data_mut(&mut self) -> Option<&mut MeshData> {
        self.data.as_mut()
    }

    /// Replace the geometry.
    pub fn set_mesh_data(&mut self, data: MeshData) {
        debug!(
            "Mesh '{}' received {} vertices, {} triangles",
            self.name,
            data.vertex_count(),
            data.triangle_count()
        );
        self.data = Some(data);
        self.state = LoadState::Ready;
    }

    /// Load progress.
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub(crate) fn set_load_state(&mut self, state: LoadState) {
        self.state = state;
    }

    /// True once the cache has torn this mesh down.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Resource for Mesh {
    const KIND: ResourceKind = ResourceKind::Mesh;

    fn destroy(&mut self) {
        self.data = None;
        self.state = LoadState::Unloaded;
        self.destroyed = true;
    }
}
