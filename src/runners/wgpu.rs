//! wgpu runner implementation

use crate::{
    error::{RenderError, Result},
    pixels::PixelBuffer,
    viewport::{validate_dimensions, Viewport},
    BackendInfo, Renderer,
};
use shared::RenderParams;
use wgpu::util::DeviceExt;

/// WebGPU-based renderer supporting multiple backends (Vulkan, Metal, DX12, etc.)
///
/// Runs the SPIR-V build of the `kernel` crate, so the escape-time loop is the
/// same Rust code the CPU renderer calls.
pub struct WgpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    backend_name: &'static str,
    adapter_name: String,
    driver_info: String,
}

impl WgpuRenderer {
    /// Create a new wgpu renderer, automatically detecting the best available backend
    pub async fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .map_err(|_| RenderError::NoAdapter)?;

        let info = adapter.get_info();
        let backend_name = match info.backend {
            wgpu::Backend::Vulkan => "Vulkan",
            wgpu::Backend::Metal => "Metal",
            wgpu::Backend::Dx12 => "DirectX 12",
            wgpu::Backend::Gl => "OpenGL",
            wgpu::Backend::BrowserWebGpu => "WebGPU",
            _ => "Unknown",
        };

        // Push constants carry the render parameters
        if !adapter.features().contains(wgpu::Features::PUSH_CONSTANTS) {
            return Err(RenderError::Other(format!(
                "{} adapter {} lacks push constant support",
                backend_name, info.name
            )));
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Mandelbrot Device"),
                required_features: wgpu::Features::PUSH_CONSTANTS,
                required_limits: wgpu::Limits {
                    max_push_constant_size: std::mem::size_of::<RenderParams>() as u32,
                    ..Default::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::default(),
            })
            .await?;

        let (pipeline, bind_group_layout) = Self::create_pipeline(&device);

        log::info!("wgpu renderer on {} ({}, {})", backend_name, info.name, info.driver);

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            backend_name,
            adapter_name: info.name,
            driver_info: info.driver,
        })
    }

    fn create_pipeline(device: &wgpu::Device) -> (wgpu::ComputePipeline, wgpu::BindGroupLayout) {
        // Use the embedded kernel from the main crate
        let spirv_data = wgpu::util::make_spirv(crate::MANDELBROT_KERNEL_SPIRV);
        let shader_module = unsafe {
            device.create_shader_module_trusted(
                wgpu::ShaderModuleDescriptor {
                    label: Some("Escape-Time Kernel"),
                    source: spirv_data,
                },
                wgpu::ShaderRuntimeChecks::unchecked(),
            )
        };

        // One storage buffer: the packed pixels
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Escape-Time Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Escape-Time Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[wgpu::PushConstantRange {
                stages: wgpu::ShaderStages::COMPUTE,
                range: 0..std::mem::size_of::<RenderParams>() as u32,
            }],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Escape-Time Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader_module,
            entry_point: Some(crate::MANDELBROT_KERNEL_ENTRY),
            compilation_options: Default::default(),
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    async fn render_async(&self, params: RenderParams, size: u64) -> Result<Vec<u32>> {
        // Each pass gets its own output buffer
        let pixel_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pixel Buffer"),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pixel Staging Buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Escape-Time Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: pixel_buffer.as_entire_binding(),
            }],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(&format!("Escape-Time Encoder {}x{}", params.width, params.height)),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Escape-Time Pass"),
                timestamp_writes: None,
            });

            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);
            compute_pass.set_push_constants(0, bytemuck::bytes_of(&params));

            // 8x8 invocations per workgroup (matching kernel)
            let [x, y, z] = params.num_workgroups();
            compute_pass.dispatch_workgroups(x, y, z);
        }

        // Copy results to staging buffer in the same submission
        encoder.copy_buffer_to_buffer(&pixel_buffer, 0, &staging_buffer, 0, size);
        self.queue.submit(Some(encoder.finish()));

        // Read results
        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        let _ = self.device.poll(wgpu::PollType::Wait);
        receiver
            .await
            .map_err(|e| RenderError::Other(format!("Channel error: {e:?}")))?
            .map_err(|e| RenderError::Other(format!("Buffer async error: {e:?}")))?;

        let pixels = {
            let view = buffer_slice.get_mapped_range();
            bytemuck::cast_slice::<u8, u32>(&view).to_vec()
        };

        staging_buffer.unmap();

        Ok(pixels)
    }
}

/// Byte size of the pixel buffer for `params`, checked against `limits`.
///
/// The buffer is bound whole, so it must fit the storage binding limit as well
/// as the plain buffer limit.
fn check_device_limits(
    limits: &wgpu::Limits,
    params: &RenderParams,
    num_pixels: usize,
) -> Result<u64> {
    let element_size = std::mem::size_of::<u32>();
    let size = num_pixels
        .checked_mul(element_size)
        .and_then(|bytes| u64::try_from(bytes).ok())
        .ok_or(RenderError::BufferSizeOverflow(num_pixels, element_size))?;

    let limit = limits
        .max_buffer_size
        .min(limits.max_storage_buffer_binding_size as u64);
    if size > limit {
        return Err(RenderError::BufferTooLarge { size, limit });
    }

    let [x, y, _] = params.num_workgroups();
    let requested = x.max(y);
    if requested > limits.max_compute_workgroups_per_dimension {
        return Err(RenderError::WorkgroupLimit {
            requested,
            limit: limits.max_compute_workgroups_per_dimension,
        });
    }

    Ok(size)
}

impl Renderer for WgpuRenderer {
    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            backend: "wgpu",
            api: Some(self.backend_name),
            adapter: Some(self.adapter_name.clone()),
            driver: Some(self.driver_info.clone()),
        }
    }

    fn render(&self, viewport: &Viewport, width: u32, height: u32) -> Result<PixelBuffer> {
        viewport.validate()?;
        let num_pixels = validate_dimensions(width, height)?;

        let params = RenderParams::new(viewport.to_params(), width, height);
        let size = check_device_limits(&self.device.limits(), &params, num_pixels)?;
        let pixels = futures::executor::block_on(self.render_async(params, size))?;

        PixelBuffer::from_vec(width, height, pixels)
    }
}
