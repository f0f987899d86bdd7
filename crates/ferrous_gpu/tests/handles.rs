use std::rc::Rc;

use ferrous_gpu::{DeviceRef, GpuError, GpuHandle, HeadlessDevice, RenderDevice, ResourceKind};

#[test]
fn dropping_a_handle_releases_exactly_once() {
    let headless = Rc::new(HeadlessDevice::new());
    let device: DeviceRef = headless.clone();

    let buffer = GpuHandle::acquire(&device, ResourceKind::VertexBuffer).unwrap();
    let id = buffer.id();
    assert!(headless.is_live(id));

    drop(buffer);
    assert!(!headless.is_live(id));
    let stats = headless.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.released, 1);
}

#[test]
fn moved_handles_keep_their_object() {
    let headless = Rc::new(HeadlessDevice::new());
    let device: DeviceRef = headless.clone();

    let handles: Vec<GpuHandle> = (0..3)
        .map(|_| GpuHandle::acquire(&device, ResourceKind::Texture).unwrap())
        .collect();
    let moved = handles;
    assert_eq!(headless.live_count(ResourceKind::Texture), 3);
    drop(moved);
    assert_eq!(headless.live_count(ResourceKind::Texture), 0);
}

#[test]
fn acquire_fails_without_a_context() {
    let headless = Rc::new(HeadlessDevice::new());
    headless.lose_context();
    let device: DeviceRef = headless;
    let err = GpuHandle::acquire(&device, ResourceKind::Program).unwrap_err();
    assert_eq!(err, GpuError::ContextUnavailable);
}
