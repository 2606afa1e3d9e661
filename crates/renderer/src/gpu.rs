//! GPU context: surface, device/queue and the window-sized depth buffer.

use std::sync::Arc;

use wgpu::{
    Backends, CommandEncoder, CommandEncoderDescriptor, Device, DeviceDescriptor, ErrorFilter,
    Extent3d, Features, Instance, InstanceDescriptor, Limits, PowerPreference, PresentMode, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceError, SurfaceTexture,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::frame::Frame;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,
    #[error("surface out of memory")]
    OutOfMemory,
}

/// Texture acquired from the surface for one frame.
pub struct SurfaceTarget {
    texture: SurfaceTexture,
    pub view: TextureView,
}

pub struct GpuContext {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    depth_view: TextureView,
    frame_index: u64,
    error_scope_open: bool,
}

impl GpuContext {
    /// Create the GPU context bound to `window`.
    pub async fn new(window: Arc<Window>, backends: Backends) -> Result<Self, GpuError> {
        let PhysicalSize { width, height } = window.inner_size();

        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!(
            "Adapter: {} ({:?}, driver {} {})",
            info.name,
            info.backend,
            info.driver,
            info.driver_info
        );

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("texlab device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                experimental_features: Default::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
        log::info!("Surface format: {format:?}");

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            surface,
            config,
            device,
            queue,
            depth_view,
            frame_index: 0,
            error_scope_open: false,
        })
    }

    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    #[inline]
    pub fn surface_format(&self) -> TextureFormat {
        self.config.format
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    #[inline]
    pub fn depth_view(&self) -> &TextureView {
        &self.depth_view
    }

    /// Reconfigure the surface and recreate the depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    /// Acquire the next surface texture. `Ok(None)` means skip this frame:
    /// the surface was reconfigured after loss or the acquire timed out.
    pub fn acquire(&mut self) -> Result<Option<SurfaceTarget>, GpuError> {
        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&TextureViewDescriptor::default());
                Ok(Some(SurfaceTarget { texture, view }))
            }
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::info!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(SurfaceError::Timeout) => {
                log::warn!("Surface acquire timed out, skipping frame");
                Ok(None)
            }
            Err(SurfaceError::OutOfMemory) => Err(GpuError::OutOfMemory),
            Err(SurfaceError::Other) => {
                log::warn!("Surface acquire failed, skipping frame");
                Ok(None)
            }
        }
    }

    /// Start recording a new frame. Opens the validation error scope that
    /// the next [`check_for_errors`](Self::check_for_errors) pops.
    pub fn begin_frame(&mut self) -> Frame {
        self.frame_index += 1;
        if !self.error_scope_open {
            self.device.push_error_scope(ErrorFilter::Validation);
            self.error_scope_open = true;
        }
        Frame::new(self.frame_index)
    }

    pub fn create_encoder(&self, label: &str) -> CommandEncoder {
        self.device
            .create_command_encoder(&CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submit the encoded frame and present the surface texture.
    pub fn present(&self, encoder: CommandEncoder, target: SurfaceTarget) {
        self.queue.submit(std::iter::once(encoder.finish()));
        target.texture.present();
    }

    /// Pop the error scope opened by the previous frame and log what it
    /// caught. Returns `true` if an error was reported.
    pub fn check_for_errors(&mut self) -> bool {
        if !self.error_scope_open {
            return false;
        }
        self.error_scope_open = false;
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => {
                log::error!("GPU error: {err}");
                true
            }
            None => false,
        }
    }
}

/// Depth attachment of the given size.
pub(crate) fn create_depth_view(device: &Device, width: u32, height: u32) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("depth"),
        size: Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

/// Prefer a non-sRGB format: shader outputs and clear colors are written
/// as-is, the way a plain GL framebuffer stores them.
fn pick_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_format_skips_srgb() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn surface_format_falls_back_to_first() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(pick_surface_format(&formats), Some(TextureFormat::Rgba8UnormSrgb));
        assert_eq!(pick_surface_format(&[]), None);
    }
}
