use std::rc::Rc;

use ferrous_app::{AppConfig, FileShaderSource, FrameDriver};
use ferrous_gpu::HeadlessDevice;
use ferrous_renderer::glam::{Mat4, Vec3};
use ferrous_renderer::{primitives, shaders, MemorySource, Mesh};

#[test]
fn sample_config_parses() {
    let text = include_str!("../ferrous.toml");
    let config = AppConfig::from_toml_str(text).unwrap();
    assert_eq!(config.renderer.frames, 5);
    assert!(config.material.preset.is_some());
}

#[test]
fn shader_files_from_config_drive_frames() {
    let dir = std::env::temp_dir().join(format!("ferrous_app_frames_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let fragment = dir.join("phong.frag.wgsl");
    std::fs::write(&fragment, shaders::BLINN_PHONG_FRAG).unwrap();

    let config = AppConfig::from_toml_str(&format!(
        "[shaders]\nfragment = {:?}\n[material]\npreset = \"snow\"\nroughness = 0.8\n",
        fragment.display().to_string()
    ))
    .unwrap();
    let fragment_origin = config.shaders.fragment.as_ref().unwrap().display().to_string();

    let headless = Rc::new(HeadlessDevice::new());
    let reader = FileShaderSource::new(&dir).with_fallback(MemorySource::builtin());
    let mut driver = FrameDriver::new(
        headless.clone(),
        ferrous_app::driver::BUILTIN_VERTEX,
        &fragment_origin,
        &reader,
    )
    .unwrap();
    assert_eq!(driver.program().texture_unit("ambient_map"), Some(1));

    let mut cube = Mesh::new(driver.device());
    cube.add_submesh(primitives::cube()).unwrap();
    cube.set_material(config.material.preset.unwrap(), config.material.roughness);
    driver.add_mesh(cube, Mat4::IDENTITY);

    for _ in 0..3 {
        let stats = driver.frame(Mat4::IDENTITY, Vec3::Z).unwrap();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.elements, 36);
    }
    assert_eq!(headless.draws().len(), 3);

    // editing the file on disk and reloading relinks the program
    let before = driver.program().generation();
    std::fs::write(&fragment, "this is not wgsl").unwrap();
    assert!(driver.reload_shaders(&reader).is_err());
    assert_eq!(driver.program().generation(), before);

    std::fs::write(&fragment, shaders::BLINN_PHONG_FRAG).unwrap();
    driver.reload_shaders(&reader).unwrap();
    assert_eq!(driver.program().generation(), before + 1);
    assert_eq!(driver.frame(Mat4::IDENTITY, Vec3::Z).unwrap().draw_calls, 1);

    std::fs::remove_dir_all(&dir).unwrap();
}
