//! Device acquisition and the shared GPU context.

use std::sync::Arc;

use anyhow::Context as _;

use crate::program::Program;

/// Everything needed to talk to one GPU.
///
/// A context is created once and then passed explicitly to every operation
/// that touches the device. It also remembers which [`Program`] is installed,
/// which is the one frames draw with.
pub struct Context {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    format: wgpu::TextureFormat,
    active: Option<Program>,
}

impl Context {
    /// Create a context with no window attached, for offscreen rendering.
    ///
    /// Offscreen targets use `Rgba8Unorm` so pixels read back are exactly the
    /// values fragment shaders wrote.
    pub fn headless() -> anyhow::Result<Self> {
        pollster::block_on(Self::headless_async())
    }

    async fn headless_async() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter found")?;

        let (device, queue) = request_device(&adapter).await?;

        Ok(Self {
            device,
            queue,
            format: wgpu::TextureFormat::Rgba8Unorm,
            active: None,
        })
    }

    /// Create a context able to present to `surface`.
    ///
    /// Prefers the surface's sRGB format when it offers one, falling back to
    /// whatever it lists first.
    pub async fn for_surface(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter compatible with the window surface")?;

        let (device, queue) = request_device(&adapter).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(caps.formats[0]);

        Ok(Self {
            device,
            queue,
            format,
            active: None,
        })
    }

    /// Install `program` as the one draws use until another takes its place.
    pub fn activate(&mut self, program: &Program) {
        self.active = Some(program.clone());
    }

    /// The installed program, if any.
    #[must_use]
    pub fn active_program(&self) -> Option<&Program> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// The color format every render target and pipeline in this context uses.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// A surface configuration matching this context's format.
    #[must_use]
    pub fn surface_config(&self, width: u32, height: u32) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }
}

async fn request_device(
    adapter: &wgpu::Adapter,
) -> anyhow::Result<(Arc<wgpu::Device>, Arc<wgpu::Queue>)> {
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Easel Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create GPU device")?;

    Ok((Arc::new(device), Arc::new(queue)))
}
