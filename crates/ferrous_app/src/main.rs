//! `ferrous_app [config.toml]`
//!
//! Draws a cube with the configured material for the configured number of
//! frames, on the headless device or an off-screen wgpu target, and logs
//! the draw statistics.

use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use ferrous_app::config::{AppConfig, Backend};
use ferrous_app::{logging, FileShaderSource, FrameDriver, FrameEnd};
use ferrous_gpu::{DeviceRef, HeadlessDevice, TargetConfig, WgpuDevice};
use ferrous_renderer::glam::{Mat4, Quat, Vec3};
use ferrous_renderer::{primitives, Material, MemorySource, Mesh, ShadingModel};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => AppConfig::default(),
    };
    logging::init(&config.log).context("installing the logger")?;

    // both devices are also kept typed, to close each frame
    let (device, frame_end): (DeviceRef, FrameEnd) = match config.renderer.backend {
        Backend::Headless => {
            let headless = Rc::new(HeadlessDevice::new());
            (headless.clone() as DeviceRef, FrameEnd::Headless(headless))
        }
        Backend::Wgpu => {
            let target = TargetConfig {
                width: config.renderer.width,
                height: config.renderer.height,
                sample_count: config.renderer.sample_count,
                ..Default::default()
            };
            let wgpu = Rc::new(WgpuDevice::headless(target)?);
            (wgpu.clone() as DeviceRef, FrameEnd::Wgpu(wgpu))
        }
    };
    log::info!("running on the {} backend", device.backend_name());

    let mut driver = build_driver(&config, device.clone())?;

    let mut cube = Mesh::new(&device);
    cube.add_submesh(primitives::cube().with_material(0))?;
    match config.material.preset {
        Some(preset) => cube.set_material(preset, config.material.roughness),
        None => {
            cube.add_material(Material::new("default", ShadingModel::default()));
        }
    }
    driver.add_mesh(cube, Mat4::IDENTITY);

    let aspect = config.renderer.width as f32 / config.renderer.height as f32;
    let eye = Vec3::new(0.0, 1.5, 4.0);
    let view_proj = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0)
        * Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

    for frame in 0..config.renderer.frames {
        let angle = frame as f32 * 0.1;
        driver.set_model(0, Mat4::from_quat(Quat::from_rotation_y(angle)));
        let stats = driver.frame(view_proj, eye)?;
        let submitted = frame_end.finish();
        log::info!(
            "frame {frame}: {} draws ({} submitted), {} elements, {} skipped",
            stats.draw_calls,
            submitted,
            stats.elements,
            stats.skipped
        );
    }

    let totals = device.stats();
    log::info!(
        "done: {} live resources, {} created, {} released, {} bytes uploaded, {} draw calls",
        totals.live_resources,
        totals.created,
        totals.released,
        totals.uploaded_bytes,
        totals.draw_calls
    );
    Ok(())
}

/// Configured shader files override the built-in stage of the same kind.
fn build_driver(config: &AppConfig, device: DeviceRef) -> anyhow::Result<FrameDriver> {
    let vertex = config.shaders.vertex.as_deref();
    let fragment = config.shaders.fragment.as_deref();
    if vertex.is_none() && fragment.is_none() {
        return Ok(FrameDriver::builtin(device)?);
    }

    let reader = FileShaderSource::default().with_fallback(MemorySource::builtin());
    let origin = |path: Option<&Path>, fallback: &str| {
        path.map_or_else(|| fallback.to_string(), |p| p.display().to_string())
    };
    let driver = FrameDriver::new(
        device,
        &origin(vertex, ferrous_app::driver::BUILTIN_VERTEX),
        &origin(fragment, ferrous_app::driver::BUILTIN_FRAGMENT),
        &reader,
    )?;
    Ok(driver)
}
