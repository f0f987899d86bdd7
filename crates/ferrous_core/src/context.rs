use std::sync::Arc;

use anyhow::Context as _;
use thiserror::Error;

/// How the adapter behind an [`EngineContext`] is chosen.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    /// Use the software adapter (useful on CI machines without a GPU).
    pub force_fallback_adapter: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
        }
    }
}

/// Device and queue of an off-screen GPU context.
///
/// There is no surface: frames are rendered into textures the backend owns.
/// `Device` and `Queue` are `Arc`-wrapped so render targets can keep their
/// own references.
pub struct EngineContext {
    pub adapter_info: wgpu::AdapterInfo,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("no GPU adapter matches {0:?}")]
    AdapterUnavailable(wgpu::Backends),
    #[error("device request failed: {0}")]
    DeviceRequest(String),
}

impl EngineContext {
    /// Context on the best adapter available.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_options(&ContextOptions::default()).await
    }

    pub async fn with_options(options: &ContextOptions) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: options.backends,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: options.power_preference,
                compatible_surface: None,
                force_fallback_adapter: options.force_fallback_adapter,
            })
            .await
            .context(ContextError::AdapterUnavailable(options.backends))?;

        let adapter_info = adapter.get_info();
        log::info!(
            "selected adapter: {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        // downlevel limits keep the context usable on GL and software adapters
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Engine Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| ContextError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            adapter_info,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }
}
