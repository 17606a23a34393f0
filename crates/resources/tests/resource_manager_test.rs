//! Integration tests for the resource manager.

use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use kick_core::{ResourceConfig, TaskQueue};
use kick_resources::provider::BUILTIN_PROTOCOL;
use kick_resources::{
    Capability, Handle, LoadState, Mesh, ProviderRegistry, ResourceError, ResourceManager,
    ResourceProvider, ResourceResult, Texture, TextureConfig, handle,
};

const CUBE: &str = "kickjs://mesh/cube/?length=2.0";

fn manager() -> (ResourceManager, Rc<TaskQueue>) {
    let queue = Rc::new(TaskQueue::new());
    let manager = ResourceManager::new(&ResourceConfig::default(), queue.clone());
    (manager, queue)
}

fn png_data_url(width: u32, height: u32, rgba: [u8; 4]) -> String {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

#[test]
fn test_default_provider_order() {
    let (manager, _) = manager();
    let protocols: Vec<_> = manager.registry().protocols().collect();
    assert_eq!(protocols, vec!["", BUILTIN_PROTOCOL]);
}

#[test]
fn test_cube_is_shared_and_counted() {
    let (mut manager, _) = manager();

    let first = manager.get_mesh(CUBE).unwrap().expect("cube mesh");
    assert_eq!(manager.mesh_cache().ref_count(CUBE), Some(1));
    {
        let mesh = first.borrow();
        let (min, max) = mesh.mesh_data().unwrap().bounds().unwrap();
        let size = max - min;
        assert!((size.x - 2.0).abs() < 1e-5);
        assert!((size.y - 2.0).abs() < 1e-5);
        assert!((size.z - 2.0).abs() < 1e-5);
    }

    let second = manager.get_mesh(CUBE).unwrap().expect("cube mesh");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(manager.mesh_cache().ref_count(CUBE), Some(2));
    assert_eq!(manager.mesh_cache().len(), 1);
}

#[test]
fn test_release_count_matches_get_count() {
    let (mut manager, _) = manager();
    let mesh = manager.get_mesh(CUBE).unwrap().unwrap();
    manager.get_mesh(CUBE).unwrap();
    manager.get_mesh(CUBE).unwrap();

    manager.release(CUBE);
    manager.release(CUBE);
    assert!(!mesh.borrow().is_destroyed());
    assert_eq!(manager.mesh_cache().ref_count(CUBE), Some(1));

    manager.release(CUBE);
    assert!(mesh.borrow().is_destroyed());
    assert!(manager.mesh_cache().is_empty());

    manager.release(CUBE);
    assert!(manager.mesh_cache().is_empty());
}

#[test]
fn test_get_then_release_leaves_other_urls_alone() {
    let (mut manager, _) = manager();
    manager.get_mesh("kickjs://mesh/plane/").unwrap().unwrap();
    manager.get_shader("kickjs://shader/phong/").unwrap().unwrap();
    manager.get_texture("kickjs://texture/white/").unwrap().unwrap();

    manager.get_mesh(CUBE).unwrap().unwrap();
    manager.release(CUBE);

    assert_eq!(manager.mesh_cache().ref_count("kickjs://mesh/plane/"), Some(1));
    assert_eq!(manager.shader_cache().ref_count("kickjs://shader/phong/"), Some(1));
    assert_eq!(manager.texture_cache().ref_count("kickjs://texture/white/"), Some(1));
    assert!(!manager.mesh_cache().contains(CUBE));
}

#[test]
fn test_gray_texture() {
    let (mut manager, _) = manager();
    let texture = manager.get_texture("kickjs://texture/gray/").unwrap().unwrap();
    let texture = texture.borrow();

    assert_eq!((texture.width(), texture.height()), (2, 2));
    assert_eq!(texture.pixels(), [127u8, 127, 127, 255].repeat(4).as_slice());
}

#[test]
fn test_release_unknown_url_is_silent() {
    let (mut manager, _) = manager();
    manager.release("unknown://nothing");

    assert!(manager.mesh_cache().is_empty());
    assert!(manager.shader_cache().is_empty());
    assert!(manager.texture_cache().is_empty());
}

#[test]
fn test_fallback_mesh_data_is_not_implemented() {
    let (manager, _) = manager();
    let mesh = handle(Mesh::new("model"));

    let err = manager.get_mesh_data("models/duck.dae", &mesh).unwrap_err();
    assert!(matches!(
        err,
        ResourceError::NotImplemented {
            capability: Capability::MeshData,
            ..
        }
    ));
}

#[test]
fn test_fallback_get_mesh_fails_and_caches_nothing() {
    let (mut manager, _) = manager();
    assert!(manager.get_mesh("models/duck.dae").is_err());
    assert!(manager.mesh_cache().is_empty());
}

#[test]
fn test_unknown_builtin_name_is_not_found() {
    let (mut manager, _) = manager();
    assert!(manager.get_mesh("kickjs://mesh/teapot/").unwrap().is_none());
    assert!(manager.get_shader("kickjs://shader/toon/").unwrap().is_none());
    assert!(manager.get_texture("kickjs://texture/purple/").unwrap().is_none());
    assert!(manager.mesh_cache().is_empty());
}

#[test]
fn test_wrong_builtin_category_is_malformed() {
    let (mut manager, _) = manager();
    let err = manager.get_mesh("kickjs://shader/phong/").unwrap_err();
    assert!(matches!(err, ResourceError::MalformedRequest { .. }));
    assert!(manager.mesh_cache().is_empty());
}

#[test]
fn test_get_after_full_release_creates_new_object() {
    let (mut manager, _) = manager();
    let url = "kickjs://shader/unlit/";
    let first = manager.get_shader(url).unwrap().unwrap();
    manager.release(url);

    let second = manager.get_shader(url).unwrap().unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert!(first.borrow().is_destroyed());
    assert!(!second.borrow().is_destroyed());
    assert_eq!(manager.shader_cache().ref_count(url), Some(1));
}

#[test]
fn test_destination_loads_bypass_cache() {
    let (manager, _) = manager();
    let mesh = handle(Mesh::new("hot reload"));

    manager
        .get_mesh_data("kickjs://meshdata/uvsphere/?slices=6&stacks=3", &mesh)
        .unwrap();

    assert_eq!(mesh.borrow().mesh_data().unwrap().vertex_count(), 7 * 4);
    assert!(manager.mesh_cache().is_empty());
}

#[test]
fn test_simulated_latency_defers_mesh_data() {
    let queue = Rc::new(TaskQueue::new());
    let config = ResourceConfig {
        simulated_latency_ms: Some(250),
        ..Default::default()
    };
    let manager = ResourceManager::new(&config, queue.clone());
    let mesh = handle(Mesh::new("deferred"));

    manager.get_mesh_data("kickjs://meshdata/cube/", &mesh).unwrap();
    assert_eq!(mesh.borrow().load_state(), &LoadState::Pending);

    queue.run_due(Duration::from_millis(250));
    assert!(mesh.borrow().load_state().is_ready());
}

#[test]
fn test_deferred_mesh_data_ignores_released_mesh() {
    let queue = Rc::new(TaskQueue::new());
    let config = ResourceConfig {
        simulated_latency_ms: Some(250),
        ..Default::default()
    };
    let mut manager = ResourceManager::new(&config, queue.clone());
    let plane = manager.get_mesh("kickjs://mesh/plane/").unwrap().unwrap();

    manager.get_mesh_data("kickjs://mesh/cube/", &plane).unwrap();
    manager.release("kickjs://mesh/plane/");
    queue.run_due(Duration::from_millis(250));

    let plane = plane.borrow();
    assert!(plane.is_destroyed());
    assert!(plane.mesh_data().is_none());
    assert!(!plane.load_state().is_ready());
}

#[test]
fn test_oversized_sphere_is_rejected() {
    let (mut manager, _) = manager();
    let err = manager
        .get_mesh("kickjs://mesh/uvsphere/?slices=1000000&stacks=1000")
        .unwrap_err();
    assert!(matches!(err, ResourceError::MalformedRequest { .. }));
    assert!(manager.mesh_cache().is_empty());
}

#[test]
fn test_fallback_image_loads_through_queue() {
    let (manager, queue) = manager();
    let texture = handle(Texture::new(TextureConfig::default()));
    let url = png_data_url(4, 4, [0, 128, 255, 255]);

    manager.get_image_data(&url, &texture).unwrap();
    assert_eq!(texture.borrow().load_state(), &LoadState::Pending);

    queue.run_all();
    let texture = texture.borrow();
    assert!(texture.load_state().is_ready());
    assert_eq!((texture.width(), texture.height()), (4, 4));
    assert_eq!(texture.pixel(3, 3), Some([0, 128, 255, 255]));
}

#[test]
fn test_failed_image_load_reports_on_destination_only() {
    let dir = tempfile::tempdir().unwrap();
    let queue = Rc::new(TaskQueue::new());
    let config = ResourceConfig {
        asset_root: dir.path().to_path_buf(),
        ..Default::default()
    };
    let manager = ResourceManager::new(&config, queue.clone());
    let texture = handle(Texture::new(TextureConfig::default()));

    manager.get_image_data("duckCM.jpg", &texture).unwrap();
    queue.run_all();

    assert!(matches!(texture.borrow().load_state(), LoadState::Failed(_)));
    assert!(manager.texture_cache().is_empty());
}

/// Provider for a custom protocol that counts how often it is asked.
struct Counting {
    calls: Rc<Cell<u32>>,
}

impl ResourceProvider for Counting {
    fn protocol(&self) -> &str {
        "custom"
    }

    fn get_texture(&self, url: &str) -> ResourceResult<Option<Texture>> {
        self.calls.set(self.calls.get() + 1);
        let mut texture = Texture::new(TextureConfig::nearest());
        texture.set_image_data(1, 1, vec![9, 9, 9, 255], url)?;
        Ok(Some(texture))
    }
}

#[test]
fn test_registered_provider_serves_its_protocol_once() {
    let (mut manager, _) = manager();
    let calls = Rc::new(Cell::new(0));
    manager.register_provider(Box::new(Counting {
        calls: calls.clone(),
    }));

    let a: Handle<Texture> = manager.get_texture("custom://sky").unwrap().unwrap();
    let b = manager.get_texture("custom://sky").unwrap().unwrap();

    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(calls.get(), 1);
    assert!(manager.get_texture("kickjs://texture/black/").unwrap().is_some());
}

#[test]
fn test_override_provider_starves_builtin_capabilities() {
    let (mut manager, _) = manager();
    manager.register_provider(Box::new(KickjsTexturesOnly));

    assert!(manager.get_texture("kickjs://texture/anything/").unwrap().is_some());
    let err = manager.get_mesh(CUBE).unwrap_err();
    assert!(matches!(err, ResourceError::NotImplemented { .. }));
}

struct KickjsTexturesOnly;

impl ResourceProvider for KickjsTexturesOnly {
    fn protocol(&self) -> &str {
        BUILTIN_PROTOCOL
    }

    fn get_texture(&self, _url: &str) -> ResourceResult<Option<Texture>> {
        Ok(Some(Texture::new(TextureConfig::default())))
    }
}

#[test]
fn test_empty_registry_finds_nothing() {
    let mut manager = ResourceManager::with_registry(ProviderRegistry::new());
    assert!(manager.get_mesh(CUBE).unwrap().is_none());
    let mesh = handle(Mesh::new("m"));
    manager.get_mesh_data(CUBE, &mesh).unwrap();
    assert!(mesh.borrow().mesh_data().is_none());
}
