//! Viewer state shared by the frame loop and file loading.

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec4;
use kick_core::{Config, TaskQueue, Time};
use kick_resources::{
    Handle, Mesh, ResourceManager, ResourceResult, Shader, Texture, TextureConfig, handle,
};
use kick_scene::{Camera, OrbitInput, OrbitRotator};
use tracing::{debug, info, warn};

/// Shader used for the model material.
pub const MATERIAL_SHADER_URL: &str = "kickjs://shader/phong/";

/// Mesh shown by the cube shortcut.
pub const CUBE_MESH_URL: &str = "kickjs://mesh/cube/";

/// Clear color choices, cycled by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    Black,
    White,
    Transparent,
}

impl Background {
    /// The background after this one.
    pub fn next(self) -> Self {
        match self {
            Background::Black => Background::White,
            Background::White => Background::Transparent,
            Background::Transparent => Background::Black,
        }
    }

    pub fn clear_color(self) -> Vec4 {
        match self {
            Background::Black => Vec4::new(0.0, 0.0, 0.0, 1.0),
            Background::White => Vec4::new(1.0, 1.0, 1.0, 1.0),
            Background::Transparent => Vec4::ZERO,
        }
    }
}

/// What a dropped or passed-in file is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Model,
    Texture,
}

/// Classify a file by extension, ignoring case.
pub fn classify_file(path: &Path) -> Option<FileKind> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "dae" | "obj" => Some(FileKind::Model),
        "jpg" | "jpeg" | "png" => Some(FileKind::Texture),
        _ => None,
    }
}

/// Everything the viewer owns.
pub struct AppContext {
    pub config: Config,
    pub queue: Rc<TaskQueue>,
    pub resources: ResourceManager,
    pub camera: Camera,
    pub rotator: OrbitRotator,
    pub time: Time,
    pub background: Background,
    pub paused: bool,
    mesh_url: Option<String>,
    mesh: Option<Handle<Mesh>>,
    shader: Option<Handle<Shader>>,
    texture: Handle<Texture>,
}

impl AppContext {
    /// Build the scene: initial mesh, material shader and texture.
    pub fn new(config: Config) -> ResourceResult<Self> {
        let queue = Rc::new(TaskQueue::new());
        let resources = ResourceManager::new(&config.resources, queue.clone());

        let mut camera = Camera::new(config.viewer.field_of_view, config.viewer.far);
        let background = Background::default();
        camera.clear_color = background.clear_color();

        let texture = handle(Texture::new(TextureConfig::default()));
        texture.borrow_mut().set_temporary_texture();

        let mut context = Self {
            config,
            queue,
            resources,
            camera,
            rotator: OrbitRotator::new(),
            time: Time::new(),
            background,
            paused: false,
            mesh_url: None,
            mesh: None,
            shader: None,
            texture,
        };

        context.shader = context.resources.get_shader(MATERIAL_SHADER_URL)?;
        if context.shader.is_none() {
            warn!("Material shader '{}' not available", MATERIAL_SHADER_URL);
        }
        let initial_mesh = context.config.viewer.initial_mesh.clone();
        context.set_mesh(&initial_mesh)?;
        let initial_texture = context.config.viewer.initial_texture.clone();
        if !initial_texture.is_empty() {
            context
                .resources
                .get_image_data(&initial_texture, &context.texture)?;
        }

        info!("Viewer ready");
        Ok(context)
    }

    /// Swap the displayed mesh, releasing the previous one.
    pub fn set_mesh(&mut self, url: &str) -> ResourceResult<()> {
        let mesh = self.resources.get_mesh(url)?;
        if mesh.is_none() {
            warn!("No mesh found at '{}'", url);
            return Ok(());
        }
        if let Some(previous) = self.mesh_url.take() {
            self.resources.release(&previous);
        }
        self.mesh = mesh;
        self.mesh_url = Some(url.to_string());
        Ok(())
    }

    /// Show the built-in cube.
    pub fn show_cube(&mut self) -> ResourceResult<()> {
        self.set_mesh(CUBE_MESH_URL)
    }

    /// Rebuild normals of the current mesh if it has none.
    ///
    /// Returns whether anything was recalculated.
    pub fn recalculate_normals(&mut self) -> bool {
        let Some(mesh) = &self.mesh else {
            return false;
        };
        let mut mesh = mesh.borrow_mut();
        let Some(data) = mesh.mesh_data_mut() else {
            return false;
        };
        if data.has_normals() {
            return false;
        }
        data.recalculate_normals();
        info!("Recalculated normals of '{}'", data.name);
        true
    }

    pub fn mesh_url(&self) -> Option<&str> {
        self.mesh_url.as_deref()
    }

    pub fn mesh(&self) -> Option<&Handle<Mesh>> {
        self.mesh.as_ref()
    }

    pub fn shader(&self) -> Option<&Handle<Shader>> {
        self.shader.as_ref()
    }

    /// Texture bound to the model material.
    pub fn texture(&self) -> &Handle<Texture> {
        &self.texture
    }

    /// Advance to the next background and apply it to the camera.
    pub fn cycle_background(&mut self) {
        self.background = self.background.next();
        self.camera.clear_color = self.background.clear_color();
        debug!("Background {:?}", self.background);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("Paused: {}", self.paused);
    }

    /// Load a model or texture file.
    pub fn load_file(&mut self, path: &Path) -> ResourceResult<()> {
        match classify_file(path) {
            Some(FileKind::Texture) => {
                info!("Loading texture {}", path.display());
                let url = path.to_string_lossy();
                self.resources.get_image_data(&url, &self.texture)
            }
            Some(FileKind::Model) => {
                warn!("Model files are not supported: {}", path.display());
                Ok(())
            }
            None => {
                warn!("Unknown file type: {}", path.display());
                Ok(())
            }
        }
    }

    /// Run one frame of `delta` length.
    pub fn frame(&mut self, delta: Duration) {
        self.time.advance(delta);
        self.queue.run_due(self.time.elapsed());
        if !self.paused {
            self.rotator.update(
                self.time.time_ms(),
                self.time.delta_ms(),
                &OrbitInput::default(),
                &mut self.camera,
            );
        }
    }

    /// Release every cached resource this context acquired.
    pub fn shutdown(&mut self) {
        if let Some(url) = self.mesh_url.take() {
            self.resources.release(&url);
        }
        if self.shader.take().is_some() {
            self.resources.release(MATERIAL_SHADER_URL);
        }
        self.mesh = None;
        info!(
            "Shut down: {} meshes, {} shaders, {} textures still cached",
            self.resources.mesh_cache().len(),
            self.resources.shader_cache().len(),
            self.resources.texture_cache().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kick_resources::LoadState;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.viewer.initial_texture = String::new();
        config
    }

    #[test]
    fn test_classify_file() {
        assert_eq!(classify_file(Path::new("duck.DAE")), Some(FileKind::Model));
        assert_eq!(classify_file(Path::new("a/b.obj")), Some(FileKind::Model));
        assert_eq!(classify_file(Path::new("x.JPEG")), Some(FileKind::Texture));
        assert_eq!(classify_file(Path::new("x.png")), Some(FileKind::Texture));
        assert_eq!(classify_file(Path::new("x.gif")), None);
        assert_eq!(classify_file(Path::new("noext")), None);
    }

    #[test]
    fn test_background_cycle() {
        let mut context = AppContext::new(test_config()).unwrap();
        assert_eq!(context.camera.clear_color, Vec4::new(0.0, 0.0, 0.0, 1.0));

        context.cycle_background();
        assert_eq!(context.background, Background::White);
        assert_eq!(context.camera.clear_color, Vec4::ONE);

        context.cycle_background();
        assert_eq!(context.camera.clear_color, Vec4::ZERO);

        context.cycle_background();
        assert_eq!(context.background, Background::Black);
    }

    #[test]
    fn test_initial_scene_is_cached() {
        let context = AppContext::new(test_config()).unwrap();
        let url = context.mesh_url().unwrap().to_string();

        assert_eq!(context.resources.mesh_cache().ref_count(&url), Some(1));
        assert_eq!(
            context.resources.shader_cache().ref_count(MATERIAL_SHADER_URL),
            Some(1)
        );
        assert!(context.mesh().unwrap().borrow().mesh_data().is_some());
    }

    #[test]
    fn test_set_mesh_releases_previous() {
        let mut context = AppContext::new(test_config()).unwrap();
        let first = context.mesh().unwrap().clone();

        context.show_cube().unwrap();

        assert!(first.borrow().is_destroyed());
        assert_eq!(context.resources.mesh_cache().len(), 1);
        assert_eq!(context.mesh_url(), Some(CUBE_MESH_URL));
    }

    #[test]
    fn test_recalculate_normals_restores_missing_normals() {
        let mut context = AppContext::new(test_config()).unwrap();
        context.show_cube().unwrap();
        {
            let mut mesh = context.mesh().unwrap().borrow_mut();
            mesh.mesh_data_mut().unwrap().normals.clear();
        }

        assert!(context.recalculate_normals());

        let mesh = context.mesh().unwrap().borrow();
        let data = mesh.mesh_data().unwrap();
        assert!(data.has_normals());
        assert!((data.normals[0].length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_recalculate_normals_keeps_existing_normals() {
        let mut context = AppContext::new(test_config()).unwrap();
        assert!(!context.recalculate_normals());
        assert!(context.mesh().unwrap().borrow().mesh_data().unwrap().has_normals());
    }

    #[test]
    fn test_recalculate_normals_without_mesh_is_noop() {
        let mut context = AppContext::new(test_config()).unwrap();
        context.shutdown();
        assert!(!context.recalculate_normals());
    }

    #[test]
    fn test_shutdown_empties_caches() {
        let mut context = AppContext::new(test_config()).unwrap();
        context.shutdown();

        assert!(context.resources.mesh_cache().is_empty());
        assert!(context.resources.shader_cache().is_empty());
        assert!(context.mesh().is_none());
    }

    #[test]
    fn test_pause_stops_orbit() {
        let mut context = AppContext::new(test_config()).unwrap();
        context.frame(Duration::from_millis(16));
        let position = context.camera.position;

        context.toggle_pause();
        context.frame(Duration::from_millis(16));
        assert_eq!(context.camera.position, position);

        context.toggle_pause();
        context.frame(Duration::from_millis(16));
        assert_ne!(context.camera.position, position);
    }

    #[test]
    fn test_missing_texture_fails_on_frame() {
        let mut context = AppContext::new(test_config()).unwrap();
        context
            .load_file(Path::new("does-not-exist.png"))
            .unwrap();
        assert_eq!(*context.texture().borrow().load_state(), LoadState::Pending);

        context.frame(Duration::from_millis(16));
        assert!(matches!(
            context.texture().borrow().load_state(),
            LoadState::Failed(_)
        ));
        assert!(context.resources.texture_cache().is_empty());
    }

    #[test]
    fn test_model_file_is_ignored() {
        let mut context = AppContext::new(test_config()).unwrap();
        context.load_file(Path::new("duck.dae")).unwrap();
        assert_ne!(*context.texture().borrow().load_state(), LoadState::Pending);
    }
}
