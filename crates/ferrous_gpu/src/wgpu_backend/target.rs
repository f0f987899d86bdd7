//! Off-screen colour and depth attachments the frame is replayed into.
//!
//! The single-sample colour texture is always created; with MSAA it is the
//! resolve target of the multisampled one.

pub(crate) struct AttachmentDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub usage: wgpu::TextureUsages,
}

pub(crate) fn create_attachment(
    device: &wgpu::Device,
    desc: &AttachmentDesc<'_>,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(desc.label),
        size: wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: desc.sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: desc.format,
        usage: desc.usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

pub(crate) struct ColorTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub msaa_view: Option<wgpu::TextureView>,
}

impl ColorTarget {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let (texture, view) = create_attachment(device, &AttachmentDesc {
            label: "Frame Colour",
            width,
            height,
            format,
            sample_count: 1,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        });
        let msaa_view = (sample_count > 1).then(|| {
            create_attachment(device, &AttachmentDesc {
                label: "Frame Colour MSAA",
                width,
                height,
                format,
                sample_count,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            })
            .1
        });
        Self { texture, view, msaa_view }
    }

    /// `(render_view, resolve_target)` for a colour attachment.
    pub fn attachment_views(&self) -> (&wgpu::TextureView, Option<&wgpu::TextureView>) {
        match &self.msaa_view {
            Some(msaa) => (msaa, Some(&self.view)),
            None => (&self.view, None),
        }
    }
}

pub(crate) struct DepthTarget {
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// The sample count must match the colour target's.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let (_, view) = create_attachment(device, &AttachmentDesc {
            label: "Frame Depth",
            width,
            height,
            format: Self::FORMAT,
            sample_count,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        });
        Self { view }
    }
}
