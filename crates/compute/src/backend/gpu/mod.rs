//! Accelerated parallel backend
//!
//! Runs the noise fill and the forward transform as wgpu compute dispatches.
//! The adapter and device are acquired once, pipelines compiled once, and
//! grow-only buffers cached behind a mutex; results come back through a
//! staging buffer. Any failure here is reported to the dispatcher, which
//! descends to the next tier; nothing in this module is a caller error.

mod shaders;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use pollster::block_on;
use thiserror::Error;

use fluxcube_noise::{NoiseKind, NoiseParams};

use shaders::{DFT_WGSL, NOISE_WGSL};

/// Accelerated tier failures; never surfaced past the dispatcher
#[derive(Debug, Clone, Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter was found")]
    NoAdapter,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(String),
    #[error("failed to compile compute shader: {0}")]
    Shader(String),
    #[error("failed to map GPU buffer for readback")]
    Map,
}

/// Non-blocking capability probe: does any adapter exist at all?
///
/// Cheaper than [`GpuExecutor::new`]; acquires no device and compiles nothing.
pub fn probe_support() -> Result<(), GpuError> {
    let instance = wgpu::Instance::default();
    let adapters = instance.enumerate_adapters(wgpu::Backends::all());
    if adapters.is_empty() {
        Err(GpuError::NoAdapter)
    } else {
        Ok(())
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct NoiseParamsPod {
    size: u32,
    kind: u32,
    octaves: u32,
    seed: u32,
    scale: f32,
    persistence: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct DftParamsPod {
    n: u32,
    axis: u32,
    _pad: [u32; 2],
}

/// Device, queue, compiled pipelines, and cached buffers for the GPU tier
pub struct GpuExecutor {
    device: wgpu::Device,
    queue: wgpu::Queue,
    noise_pipeline: wgpu::ComputePipeline,
    noise_layout: wgpu::BindGroupLayout,
    dft_pipeline: wgpu::ComputePipeline,
    dft_layout: wgpu::BindGroupLayout,
    buffers: Mutex<GpuBuffers>,
}

impl GpuExecutor {
    /// Acquire the device and build both pipelines
    ///
    /// Blocks on the async adapter/device handshake; the dispatcher memoizes
    /// the result so this runs at most once per process lifetime.
    pub fn new() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::default();
        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) =
            block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None))
                .map_err(|err| GpuError::RequestDevice(err.to_string()))?;

        let noise_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluxcube.gpu.noise.layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let dft_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fluxcube.gpu.dft.layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let noise_pipeline = Self::build_pipeline(
            &device,
            &noise_layout,
            NOISE_WGSL,
            "fluxcube.gpu.noise",
        )?;
        let dft_pipeline =
            Self::build_pipeline(&device, &dft_layout, DFT_WGSL, "fluxcube.gpu.dft")?;

        Ok(Self {
            device,
            queue,
            noise_pipeline,
            noise_layout,
            dft_pipeline,
            dft_layout,
            buffers: Mutex::new(GpuBuffers::default()),
        })
    }

    fn build_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        source: &str,
        label: &str,
    ) -> Result<wgpu::ComputePipeline, GpuError> {
        let shader = catch_unwind(AssertUnwindSafe(|| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        }))
        .map_err(|payload| GpuError::Shader(panic_payload_to_string(payload)))?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });

        Ok(
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: "main",
                compilation_options: Default::default(),
            }),
        )
    }

    /// Fill a flat noise lattice on the GPU
    pub fn compute_noise(&self, params: &NoiseParams) -> Result<Vec<f32>, GpuError> {
        let n = params.size.dim() as u32;
        let total = params.size.cells();
        let out_bytes = (total * std::mem::size_of::<f32>()) as u64;

        let (output, staging, uniform) = {
            let mut buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
            let output = buffers.ensure(
                &self.device,
                BufferSlot::NoiseOutput,
                out_bytes,
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            );
            let staging = buffers.ensure(
                &self.device,
                BufferSlot::NoiseStaging,
                out_bytes,
                wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            );
            let uniform = buffers.ensure_uniform(
                &self.device,
                BufferSlot::NoiseParams,
                std::mem::size_of::<NoiseParamsPod>() as u64,
            );
            (output, staging, uniform)
        };

        let pod = NoiseParamsPod {
            size: n,
            kind: match params.kind {
                NoiseKind::Gradient => 0,
                NoiseKind::CellDistance => 1,
                NoiseKind::CellDistanceDiff => 2,
            },
            octaves: params.octaves,
            seed: params.seed32(),
            scale: params.scale as f32,
            persistence: params.persistence as f32,
            _pad: [0.0, 0.0],
        };
        self.queue.write_buffer(uniform.as_ref(), 0, bytes_of(&pod));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fluxcube.gpu.noise.bind_group"),
            layout: &self.noise_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fluxcube.gpu.noise.encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("fluxcube.gpu.noise.pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.noise_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let groups = n.div_ceil(8);
            pass.dispatch_workgroups(groups, groups, groups);
        }
        encoder.copy_buffer_to_buffer(output.as_ref(), 0, staging.as_ref(), 0, out_bytes);
        self.queue.submit(Some(encoder.finish()));

        self.read_staging(&staging, out_bytes)
    }

    /// Forward 3D transform: three axis passes of the 1D DFT shader
    ///
    /// Returns `(real, imag)` coefficient arrays in lattice layout.
    pub fn compute_fft(
        &self,
        real: &[f32],
        imag: &[f32],
        n: usize,
    ) -> Result<(Vec<f32>, Vec<f32>), GpuError> {
        let total = n * n * n;
        // Interleaved complex layout matching the shader's array<vec2<f32>>
        let mut input = Vec::with_capacity(total * 2);
        for i in 0..total {
            input.push(real[i]);
            input.push(imag[i]);
        }
        let complex_bytes = (total * 2 * std::mem::size_of::<f32>()) as u64;

        let (ping, pong, staging, uniform) = {
            let mut buffers = self.buffers.lock().unwrap_or_else(|e| e.into_inner());
            let ping = buffers.ensure(
                &self.device,
                BufferSlot::FftPing,
                complex_bytes,
                wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
            );
            let pong = buffers.ensure(
                &self.device,
                BufferSlot::FftPong,
                complex_bytes,
                wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
            );
            let staging = buffers.ensure(
                &self.device,
                BufferSlot::FftStaging,
                complex_bytes,
                wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            );
            let uniform = buffers.ensure_uniform(
                &self.device,
                BufferSlot::FftParams,
                std::mem::size_of::<DftParamsPod>() as u64,
            );
            (ping, pong, staging, uniform)
        };

        self.queue.write_buffer(ping.as_ref(), 0, cast_slice(&input));

        // Axis passes ping -> pong -> ping -> pong
        let groups = ((total as u32) + 63) / 64;
        for axis in 0u32..3 {
            let (src, dst) = if axis % 2 == 0 {
                (&ping, &pong)
            } else {
                (&pong, &ping)
            };

            let pod = DftParamsPod {
                n: n as u32,
                axis,
                _pad: [0, 0],
            };
            self.queue.write_buffer(uniform.as_ref(), 0, bytes_of(&pod));

            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("fluxcube.gpu.dft.bind_group"),
                layout: &self.dft_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: src.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: dst.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniform.as_entire_binding(),
                    },
                ],
            });

            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("fluxcube.gpu.dft.encoder"),
                });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("fluxcube.gpu.dft.pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.dft_pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.dispatch_workgroups(groups.max(1), 1, 1);
            }
            if axis == 2 {
                encoder.copy_buffer_to_buffer(dst.as_ref(), 0, staging.as_ref(), 0, complex_bytes);
            }
            self.queue.submit(Some(encoder.finish()));
        }

        let interleaved = self.read_staging(&staging, complex_bytes)?;
        let out_real: Vec<f32> = interleaved.iter().step_by(2).copied().collect();
        let out_imag: Vec<f32> = interleaved.iter().skip(1).step_by(2).copied().collect();
        Ok((out_real, out_imag))
    }

    fn read_staging(&self, staging: &wgpu::Buffer, bytes: u64) -> Result<Vec<f32>, GpuError> {
        let slice = staging.slice(0..bytes);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = sender.send(res);
        });
        self.device.poll(wgpu::Maintain::Wait);
        match receiver.recv().map_err(|_| GpuError::Map)? {
            Ok(()) => {}
            Err(_) => return Err(GpuError::Map),
        }
        let data = slice.get_mapped_range();
        let floats: Vec<f32> = cast_slice::<u8, f32>(&data).to_vec();
        drop(data);
        staging.unmap();
        Ok(floats)
    }
}

/// Named cache slots; each keeps its usage flags for the executor's lifetime
#[derive(Clone, Copy)]
enum BufferSlot {
    NoiseOutput,
    NoiseStaging,
    NoiseParams,
    FftPing,
    FftPong,
    FftStaging,
    FftParams,
}

#[derive(Default)]
struct GpuBuffers {
    noise_output: Option<CachedBuffer>,
    noise_staging: Option<CachedBuffer>,
    noise_params: Option<Arc<wgpu::Buffer>>,
    fft_ping: Option<CachedBuffer>,
    fft_pong: Option<CachedBuffer>,
    fft_staging: Option<CachedBuffer>,
    fft_params: Option<Arc<wgpu::Buffer>>,
}

struct CachedBuffer {
    buffer: Arc<wgpu::Buffer>,
    bytes: u64,
}

impl GpuBuffers {
    /// Grow-only storage/staging buffer for a slot, padded 10% on realloc
    fn ensure(
        &mut self,
        device: &wgpu::Device,
        slot: BufferSlot,
        bytes: u64,
        usage: wgpu::BufferUsages,
    ) -> Arc<wgpu::Buffer> {
        let (slot_ref, label) = match slot {
            BufferSlot::NoiseOutput => (&mut self.noise_output, "fluxcube.gpu.noise.output"),
            BufferSlot::NoiseStaging => (&mut self.noise_staging, "fluxcube.gpu.noise.staging"),
            BufferSlot::FftPing => (&mut self.fft_ping, "fluxcube.gpu.fft.ping"),
            BufferSlot::FftPong => (&mut self.fft_pong, "fluxcube.gpu.fft.pong"),
            BufferSlot::FftStaging => (&mut self.fft_staging, "fluxcube.gpu.fft.staging"),
            BufferSlot::NoiseParams | BufferSlot::FftParams => {
                unreachable!("uniform slots go through ensure_uniform")
            }
        };

        let needs_alloc = slot_ref.as_ref().map(|buf| buf.bytes < bytes).unwrap_or(true);
        if needs_alloc {
            let padded = bytes.max(4).saturating_mul(11) / 10;
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: padded,
                usage,
                mapped_at_creation: false,
            });
            *slot_ref = Some(CachedBuffer {
                buffer: Arc::new(buffer),
                bytes: padded,
            });
        }

        match slot_ref.as_ref() {
            Some(cached) => cached.buffer.clone(),
            // ensure() just filled the slot; unreachable in practice
            None => unreachable!("buffer slot must be allocated"),
        }
    }

    /// Fixed-size uniform buffer for a slot
    fn ensure_uniform(
        &mut self,
        device: &wgpu::Device,
        slot: BufferSlot,
        size: u64,
    ) -> Arc<wgpu::Buffer> {
        let (slot_ref, label) = match slot {
            BufferSlot::NoiseParams => (&mut self.noise_params, "fluxcube.gpu.noise.params"),
            BufferSlot::FftParams => (&mut self.fft_params, "fluxcube.gpu.fft.params"),
            _ => unreachable!("storage slots go through ensure"),
        };

        if let Some(buf) = slot_ref.as_ref() {
            return buf.clone();
        }
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let buf = Arc::new(buffer);
        *slot_ref = Some(buf.clone());
        buf
    }
}

fn panic_payload_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
