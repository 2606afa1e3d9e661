//! Per-frame draw recording.
//!
//! Scenes record passes and draw calls into a [`Frame`]; the platform then
//! encodes the whole frame into one command encoder. Every pass clears its
//! color and depth attachments before drawing.

use corelib::Viewport;
use wgpu::{
    BindGroup, Buffer, Color, CommandEncoder, IndexFormat, LoadOp, Operations,
    RenderPassColorAttachment, RenderPassDepthStencilAttachment, RenderPassDescriptor,
    RenderPipeline, StoreOp, TextureView,
};

use crate::texture::RenderTarget;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("draw recorded before any pass was started")]
    NoPass,
}

/// Where a pass renders.
#[derive(Clone)]
pub enum PassTarget {
    /// The window surface and its depth buffer.
    Surface,
    Offscreen(RenderTarget),
}

/// Everything needed to replay one indexed draw.
pub(crate) struct DrawCall {
    pub pipeline: RenderPipeline,
    pub uniforms: BindGroup,
    pub uniform_offset: u32,
    pub material: Option<BindGroup>,
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_count: u32,
}

struct Pass {
    target: PassTarget,
    clear: Color,
    viewport: Option<Viewport>,
    draws: Vec<DrawCall>,
}

pub struct Frame {
    index: u64,
    passes: Vec<Pass>,
}

impl Frame {
    pub(crate) fn new(index: u64) -> Self {
        Self {
            index,
            passes: Vec::new(),
        }
    }

    /// Monotonic frame counter, starting at 1.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Start a new pass that clears `target` to `color` (and depth to 1.0).
    /// `viewport` defaults to the whole target.
    pub fn clear(&mut self, target: PassTarget, color: [f32; 4], viewport: Option<Viewport>) {
        let [r, g, b, a] = color.map(f64::from);
        self.passes.push(Pass {
            target,
            clear: Color { r, g, b, a },
            viewport,
            draws: Vec::new(),
        });
    }

    pub(crate) fn push_draw(&mut self, draw: DrawCall) -> Result<(), FrameError> {
        let pass = self.passes.last_mut().ok_or(FrameError::NoPass)?;
        pass.draws.push(draw);
        Ok(())
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn draw_count(&self) -> usize {
        self.passes.iter().map(|p| p.draws.len()).sum()
    }

    /// Encode every recorded pass in order.
    pub fn encode(
        self,
        encoder: &mut CommandEncoder,
        surface_view: &TextureView,
        depth_view: &TextureView,
        surface_size: Viewport,
    ) {
        for pass in self.passes {
            let (color, depth, size) = match &pass.target {
                PassTarget::Surface => (surface_view, depth_view, surface_size),
                PassTarget::Offscreen(rt) => (rt.color_view(), rt.depth_view(), rt.size()),
            };
            let vp = pass_viewport(pass.viewport, size);

            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: color,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(pass.clear),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            rpass.set_viewport(0.0, 0.0, vp.width as f32, vp.height as f32, 0.0, 1.0);

            for draw in &pass.draws {
                rpass.set_pipeline(&draw.pipeline);
                rpass.set_bind_group(0, &draw.uniforms, &[draw.uniform_offset]);
                if let Some(material) = &draw.material {
                    rpass.set_bind_group(1, material, &[]);
                }
                rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                rpass.set_index_buffer(draw.index_buffer.slice(..), IndexFormat::Uint32);
                rpass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }
    }
}

/// Requested viewport, or the whole target, never larger than the target.
fn pass_viewport(requested: Option<Viewport>, target: Viewport) -> Viewport {
    requested.unwrap_or(target).clamp_to(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_starts_a_pass() {
        let mut frame = Frame::new(3);
        assert_eq!(frame.index(), 3);
        frame.clear(PassTarget::Surface, [0.5, 0.5, 0.5, 1.0], None);
        frame.clear(PassTarget::Surface, [0.0; 4], Some(Viewport::new(10, 10)));
        assert_eq!(frame.pass_count(), 2);
        assert_eq!(frame.draw_count(), 0);
        assert_eq!(frame.passes[0].clear.r, 0.5);
    }

    #[test]
    fn viewport_defaults_to_target_and_is_clamped() {
        let target = Viewport::new(800, 600);
        assert_eq!(pass_viewport(None, target), target);
        assert_eq!(
            pass_viewport(Some(Viewport::new(1024, 512)), target),
            Viewport::new(800, 512)
        );
    }
}
