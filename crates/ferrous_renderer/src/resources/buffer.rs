//! Owning wrappers over GPU buffer objects.
//!
//! A [`GpuBuffer`] pairs one buffer handle with its CPU-side staging data.
//! Uploads always send the whole staging vector and replace whatever the GPU
//! held before.

use bytemuck::Pod;
use ferrous_gpu::{DeviceRef, GpuError, GpuHandle, ResourceId, ResourceKind, VertexLayout};

/// A vertex or index buffer plus its staging data.
pub struct GpuBuffer<T: Pod> {
    handle: GpuHandle,
    staging: Vec<T>,
    /// Elements currently on the GPU.
    uploaded: usize,
}

impl<T: Pod> GpuBuffer<T> {
    /// Acquires an empty buffer.  `kind` must be a vertex or index buffer.
    pub fn create(device: &DeviceRef, kind: ResourceKind) -> Result<Self, GpuError> {
        debug_assert!(matches!(
            kind,
            ResourceKind::VertexBuffer | ResourceKind::IndexBuffer
        ));
        Ok(Self {
            handle: GpuHandle::acquire(device, kind)?,
            staging: Vec::new(),
            uploaded: 0,
        })
    }

    /// Acquires a buffer with `data` staged but not yet uploaded.
    pub fn with_data(device: &DeviceRef, kind: ResourceKind, data: Vec<T>) -> Result<Self, GpuError> {
        let mut buffer = Self::create(device, kind)?;
        buffer.staging = data;
        Ok(buffer)
    }

    pub fn staging(&self) -> &[T] {
        &self.staging
    }

    /// Mutable staging data; changes reach the GPU on the next [`upload`](Self::upload).
    pub fn staging_mut(&mut self) -> &mut Vec<T> {
        &mut self.staging
    }

    /// Sends the staging data to the GPU, replacing the previous contents.
    pub fn upload(&mut self) -> Result<(), GpuError> {
        self.handle
            .device()
            .upload_buffer(self.handle.id(), bytemuck::cast_slice(&self.staging))?;
        self.uploaded = self.staging.len();
        log::debug!(
            "uploaded {} elements to {:?} {:?}",
            self.uploaded,
            self.handle.kind(),
            self.handle.id()
        );
        Ok(())
    }

    /// Replaces the staging data with `data` and uploads it.
    pub fn upload_data(&mut self, data: &[T]) -> Result<(), GpuError> {
        self.staging.clear();
        self.staging.extend_from_slice(data);
        self.upload()
    }

    /// Drops the staging copy once the GPU holds the data.
    pub fn release_staging(&mut self) {
        self.staging = Vec::new();
    }

    /// Number of elements on the GPU after the last upload.
    #[inline]
    pub fn len(&self) -> usize {
        self.uploaded
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uploaded == 0
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.handle.id()
    }
}

/// The binding object tying a vertex buffer, an index buffer and a layout.
pub struct VertexArray {
    handle: GpuHandle,
    configured: bool,
}

impl VertexArray {
    pub fn create(device: &DeviceRef) -> Result<Self, GpuError> {
        Ok(Self {
            handle: GpuHandle::acquire(device, ResourceKind::VertexArray)?,
            configured: false,
        })
    }

    pub fn configure<V: Pod, I: Pod>(
        &mut self,
        vertices: &GpuBuffer<V>,
        indices: &GpuBuffer<I>,
        layout: &VertexLayout,
    ) -> Result<(), GpuError> {
        self.handle
            .device()
            .configure_vertex_array(self.handle.id(), vertices.id(), indices.id(), layout)?;
        self.configured = true;
        Ok(())
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Draws `index_count` indices with the device's current program.
    pub fn draw(&self, index_count: u32) -> Result<(), GpuError> {
        self.handle.device().draw_indexed(self.handle.id(), index_count)
    }

    /// Draws the first `vertex_count` vertices as points.
    pub fn draw_points(&self, vertex_count: u32) -> Result<(), GpuError> {
        self.handle.device().draw_points(self.handle.id(), vertex_count)
    }

    #[inline]
    pub fn id(&self) -> ResourceId {
        self.handle.id()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use ferrous_gpu::HeadlessDevice;

    use super::*;

    #[test]
    fn second_upload_replaces_the_first() {
        let headless = Rc::new(HeadlessDevice::new());
        let device: DeviceRef = headless.clone();
        let mut buffer = GpuBuffer::<u32>::create(&device, ResourceKind::IndexBuffer).unwrap();

        buffer.upload_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        buffer.upload_data(&[7, 8, 9]).unwrap();

        let contents = headless.buffer_contents(buffer.id()).unwrap();
        assert_eq!(contents, bytemuck::cast_slice::<u32, u8>(&[7, 8, 9]));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn staging_edits_need_an_upload() {
        let headless = Rc::new(HeadlessDevice::new());
        let device: DeviceRef = headless.clone();
        let mut buffer =
            GpuBuffer::with_data(&device, ResourceKind::VertexBuffer, vec![1.0f32, 2.0]).unwrap();
        assert!(buffer.is_empty());

        buffer.upload().unwrap();
        buffer.staging_mut().push(3.0);
        assert_eq!(buffer.len(), 2);

        buffer.upload().unwrap();
        buffer.release_staging();
        assert_eq!(buffer.len(), 3);
        assert!(buffer.staging().is_empty());
        assert_eq!(headless.buffer_contents(buffer.id()).unwrap().len(), 12);
    }

    #[test]
    fn out_of_memory_is_reported() {
        let headless = Rc::new(HeadlessDevice::with_memory_budget(16));
        let device: DeviceRef = headless;
        let mut buffer = GpuBuffer::<f32>::create(&device, ResourceKind::VertexBuffer).unwrap();
        let err = buffer.upload_data(&[0.0; 8]).unwrap_err();
        assert!(matches!(err, GpuError::OutOfMemory { requested: 32, .. }));
        assert_eq!(buffer.len(), 0);
    }
}
