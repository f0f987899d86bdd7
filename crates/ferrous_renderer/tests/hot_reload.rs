use std::rc::Rc;

use ferrous_gpu::{DeviceRef, HeadlessDevice, ResourceKind, StageKind};
use ferrous_renderer::{
    primitives, MemorySource, Mesh, ProgramError, ShaderProgram, ShaderRegistry,
};

const VERT: &str = "common.vert.wgsl";
const FRAG: &str = "cook_torrance.frag.wgsl";

fn program_from(source: &MemorySource) -> (Rc<HeadlessDevice>, ShaderRegistry, ShaderProgram) {
    let headless = Rc::new(HeadlessDevice::new());
    let device: DeviceRef = headless.clone();
    let mut registry = ShaderRegistry::new(device);
    let vs = registry.add_origin(StageKind::Vertex, VERT, source).unwrap();
    let fs = registry.add_origin(StageKind::Fragment, FRAG, source).unwrap();
    let program = ShaderProgram::with_stages(&registry, &[vs, fs]).unwrap();
    (headless, registry, program)
}

#[test]
fn failed_reload_changes_nothing() {
    let mut source = MemorySource::builtin();
    let (headless, mut registry, mut program) = program_from(&source);
    let id = program.id();
    let stages = program.stages().to_vec();
    let fragment_text = registry.get(stages[1]).unwrap().source().to_string();
    let live_stages = headless.live_count(ResourceKind::ShaderStage(StageKind::Vertex));

    source.insert(FRAG, "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }");
    let err = program.update_shaders(&mut registry, &source).unwrap_err();
    assert!(matches!(err, ProgramError::Compile { stage: StageKind::Fragment, .. }));

    assert_eq!(program.id(), id);
    assert!(program.is_linked());
    assert_eq!(program.generation(), 1);
    assert_eq!(program.stages(), stages.as_slice());
    assert_eq!(registry.get(stages[1]).unwrap().source(), fragment_text);
    // the candidate vertex stage was released again
    assert_eq!(
        headless.live_count(ResourceKind::ShaderStage(StageKind::Vertex)),
        live_stages
    );

    let mut mesh = Mesh::new(registry.device());
    mesh.add_submesh(primitives::cube()).unwrap();
    mesh.load(&program).unwrap();
    assert_eq!(mesh.draw(&program).unwrap().draw_calls, 1);
    assert_eq!(headless.draws()[0].program, id);
}

#[test]
fn missing_origin_fails_the_reload() {
    let mut source = MemorySource::builtin();
    let (_, mut registry, mut program) = program_from(&source);
    source.remove(VERT);

    let err = program.update_shaders(&mut registry, &source).unwrap_err();
    assert!(matches!(err, ProgramError::Compile { stage: StageKind::Vertex, .. }));
    assert!(program.is_linked());
}

#[test]
fn link_failure_keeps_the_old_program() {
    let mut source = MemorySource::builtin();
    let (_, mut registry, mut program) = program_from(&source);
    let id = program.id();

    // compiles, but reads a location the vertex stage never writes
    source.insert(
        FRAG,
        "@fragment fn fs_main(@location(7) x: vec4<f32>) -> @location(0) vec4<f32> { return x; }",
    );
    let err = program.update_shaders(&mut registry, &source).unwrap_err();
    assert!(matches!(err, ProgramError::Link { .. }));
    assert_eq!(program.id(), id);
    assert!(program.is_linked());
}

#[test]
fn successful_reload_swaps_everything() {
    let mut source = MemorySource::builtin();
    let (headless, mut registry, mut program) = program_from(&source);
    let old = program.id();

    let flat = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
    source.insert(FRAG, flat);
    program.update_shaders(&mut registry, &source).unwrap();

    assert_ne!(program.id(), old);
    assert!(!headless.is_live(old));
    assert_eq!(program.generation(), 2);
    assert_eq!(program.texture_unit("base_color_map"), None);
    assert_eq!(registry.get(program.stages()[1]).unwrap().source(), flat);
    assert_eq!(headless.live_count(ResourceKind::Program), 1);
}
