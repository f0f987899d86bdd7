//! Built-in WGSL programs.
//!
//! Every program pairs [`COMMON_VERT`] with one fragment stage.  Uniform
//! names follow `camera.*` and `material.*`; material textures are named
//! after their slot with a `_map` suffix (see `TextureSlot::uniform_name`).

pub const COMMON_VERT: &str = include_str!("common.vert.wgsl");
pub const COOK_TORRANCE_FRAG: &str = include_str!("cook_torrance.frag.wgsl");
pub const BLINN_PHONG_FRAG: &str = include_str!("blinn_phong.frag.wgsl");

/// `(file name, source)` of every built-in stage.
pub const ALL: &[(&str, &str)] = &[
    ("common.vert.wgsl", COMMON_VERT),
    ("cook_torrance.frag.wgsl", COOK_TORRANCE_FRAG),
    ("blinn_phong.frag.wgsl", BLINN_PHONG_FRAG),
];
