//! Headless readback of the device-side field.
//!
//! Runs `evaluate_field` from `shaders/field.wgsl` in a compute pass over a
//! particle buffer and reads the results back, so the WGSL formula can be
//! compared against [`FieldEvaluator`](crate::field::FieldEvaluator) without
//! a window.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::field::FieldOutput;
use crate::profile::FieldProfile;
use crate::shader::{self, PROBE_WORKGROUP_SIZE};
use crate::store::ParticleAttributes;

/// Matches `struct ProbeOutput` in the probe shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ProbeOutput {
    displacement: [f32; 3],
    size_scale: f32,
    alpha: f32,
    _pad: [f32; 3],
}

/// Matches `struct ProbeParams` in the probe shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ProbeParams {
    pointer: [f32; 2],
    time: f32,
    count: u32,
}

/// Compute pipeline evaluating one profile's field on the GPU.
pub struct DeviceProbe {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl DeviceProbe {
    /// Create a probe on any available adapter, blocking until ready.
    pub fn new(profile: &FieldProfile) -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async(profile))
    }

    pub async fn new_async(profile: &FieldProfile) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Probe Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Probe Shader"),
            source: wgpu::ShaderSource::Wgsl(shader::probe_shader(profile).into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Probe Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Probe Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Probe Pipeline"),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        log::debug!("Device probe ready for profile '{}'", profile.name);

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
        })
    }

    /// Evaluate every particle at one pointer position and time.
    pub fn evaluate(
        &self,
        particles: &[ParticleAttributes],
        pointer: Vec2,
        time: f32,
    ) -> Result<Vec<FieldOutput>, GpuError> {
        if particles.is_empty() {
            return Ok(Vec::new());
        }
        let count = particles.len() as u32;
        let output_size = (particles.len() * std::mem::size_of::<ProbeOutput>()) as u64;

        let particle_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Probe Particle Buffer"),
            contents: bytemuck::cast_slice(particles),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Probe Output Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Probe Staging Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let params = ProbeParams {
            pointer: pointer.to_array(),
            time,
            count,
        };
        let params_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Probe Params Buffer"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Probe Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: particle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Probe Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Probe Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);
            compute_pass.dispatch_workgroups(count.div_ceil(PROBE_WORKGROUP_SIZE), 1, 1);
        }

        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, output_size);
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);

        receiver
            .recv()
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?
            .map_err(|e| GpuError::BufferMapping(e.to_string()))?;

        let outputs = {
            let data = buffer_slice.get_mapped_range();
            bytemuck::cast_slice::<u8, ProbeOutput>(&data[..])
                .iter()
                .map(|o| FieldOutput {
                    displacement: Vec3::from_array(o.displacement),
                    size_scale: o.size_scale,
                    alpha: o.alpha,
                })
                .collect()
        };
        staging_buffer.unmap();

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_probe_structs_match_wgsl() {
        assert_eq!(size_of::<ProbeOutput>(), 32);
        assert_eq!(size_of::<ProbeParams>(), 16);
    }
}
