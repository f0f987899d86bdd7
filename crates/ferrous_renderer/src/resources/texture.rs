use ferrous_core::ImageData;
use ferrous_gpu::{DeviceRef, GpuError, GpuHandle, ResourceId, ResourceKind};

/// An owned 2-D texture.
pub struct Texture {
    handle: GpuHandle,
    size: Option<(u32, u32)>,
}

impl Texture {
    pub fn create(device: &DeviceRef) -> Result<Self, GpuError> {
        Ok(Self {
            handle: GpuHandle::acquire(device, ResourceKind::Texture)?,
            size: None,
        })
    }

    /// Creates a texture and uploads `image` into it.
    pub fn from_image(device: &DeviceRef, image: &ImageData) -> Result<Self, GpuError> {
        let mut texture = Self::create(device)?;
        texture.upload(image)?;
        Ok(texture)
    }

    pub fn upload(&mut self, image: &ImageData) -> Result<(), GpuError> {
        self.handle.device().upload_texture(self.handle.id(), image)?;
        self.size = Some((image.width(), image.height()));
        Ok(())
    }

    pub fn bind(&self, unit: u32) -> Result<(), GpuError> {
        log::trace!("binding texture {:?} to unit {unit}", self.handle.id());
        self.handle.device().bind_texture(unit, self.handle.id())
    }

    /// `(width, height)` of the last upload.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.handle.id()
    }
}
