//! Closing a frame on the concrete device behind a [`DeviceRef`](ferrous_gpu::DeviceRef).

use std::rc::Rc;

use ferrous_gpu::{HeadlessDevice, WgpuDevice};

/// Typed handle on the running device, kept next to its `DeviceRef`.
pub enum FrameEnd {
    /// Drains the recorded draws so they do not pile up across frames.
    Headless(Rc<HeadlessDevice>),
    /// Replays the recorded draws into the off-screen target.
    Wgpu(Rc<WgpuDevice>),
}

impl FrameEnd {
    /// Ends the frame and returns the number of non-empty draws it held.
    pub fn finish(&self) -> usize {
        match self {
            FrameEnd::Headless(device) => device
                .take_draws()
                .iter()
                .filter(|d| d.element_count > 0)
                .count(),
            FrameEnd::Wgpu(device) => device.end_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrous_gpu::DeviceRef;
    use ferrous_renderer::glam::{Mat4, Vec3};
    use ferrous_renderer::{primitives, MaterialPreset, Mesh};

    use super::*;
    use crate::FrameDriver;

    #[test]
    fn headless_frames_are_drained() {
        let headless = Rc::new(HeadlessDevice::new());
        let device: DeviceRef = headless.clone();
        let end = FrameEnd::Headless(headless.clone());
        let mut driver = FrameDriver::builtin(device.clone()).unwrap();
        let mut cube = Mesh::new(&device);
        cube.add_submesh(primitives::cube()).unwrap();
        cube.set_material(MaterialPreset::Copper, 0.4);
        driver.add_mesh(cube, Mat4::IDENTITY);

        for _ in 0..4 {
            driver.frame(Mat4::IDENTITY, Vec3::Z).unwrap();
            assert_eq!(end.finish(), 1);
            assert!(headless.draws().is_empty());
        }
    }
}
