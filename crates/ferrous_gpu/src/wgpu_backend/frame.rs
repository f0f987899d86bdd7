//! Draws recorded during a frame and their replay into a render pass.

use std::sync::Arc;

use wgpu::{
    LoadOp, Operations, RenderPassColorAttachment, RenderPassDepthStencilAttachment,
    RenderPassDescriptor, StoreOp,
};

use super::target::{ColorTarget, DepthTarget};

/// Everything needed to replay one draw.
pub(crate) struct DrawCommand {
    pub pipeline: Arc<wgpu::RenderPipeline>,
    /// `(group index, bind group)` for every group the pipeline uses.
    pub bind_groups: Vec<(u32, wgpu::BindGroup)>,
    pub vertex_buffer: Arc<wgpu::Buffer>,
    /// `None` draws `count` vertices without indices.
    pub index_buffer: Option<Arc<wgpu::Buffer>>,
    pub count: u32,
}

/// Draws collected between two `end_frame` calls.
#[derive(Default)]
pub(crate) struct FrameList {
    pub commands: Vec<DrawCommand>,
}

impl FrameList {
    /// Clears colour and depth, then emits one draw per command.
    pub fn replay(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: &ColorTarget,
        depth: &DepthTarget,
        clear_color: wgpu::Color,
    ) {
        let (view, resolve_target) = color.attachment_views();
        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Frame Pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view,
                resolve_target,
                ops: Operations {
                    load: LoadOp::Clear(clear_color),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        for cmd in &self.commands {
            rpass.set_pipeline(&cmd.pipeline);
            for (index, group) in &cmd.bind_groups {
                rpass.set_bind_group(*index, group, &[]);
            }
            rpass.set_vertex_buffer(0, cmd.vertex_buffer.slice(..));
            match &cmd.index_buffer {
                Some(indices) => {
                    rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..cmd.count, 0, 0..1);
                }
                None => rpass.draw(0..cmd.count, 0..1),
            }
        }
    }
}
