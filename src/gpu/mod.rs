//! wgpu renderer for the particle field.
//!
//! One render pipeline draws every particle as an instanced 6-vertex quad.
//! What the instance buffer holds depends on [`ExecutionMode`]:
//!
//! - `Host`: [`SpriteInstance`] records rewritten by the CPU each frame and
//!   uploaded when dirty
//! - `Device`: static [`ParticleAttributes`] uploaded once; the vertex stage
//!   evaluates the field itself and only pointer and time change per frame

mod probe;

use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use probe::DeviceProbe;

use crate::camera::Camera;
use crate::error::GpuError;
use crate::frame::FrameInput;
use crate::host::{HostBuffers, SpriteInstance};
use crate::profile::FieldProfile;
use crate::shader;
use crate::store::{ParticleAttributes, ParticleStore};
use crate::uniforms::FrameUniforms;

/// Where the field formula runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// CPU loop writes per-instance buffers every frame.
    Host,
    /// WGSL vertex stage evaluates the field from static attributes.
    #[default]
    Device,
}

const HOST_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32,   // size
    2 => Float32x3, // color
    3 => Float32    // alpha
];

const DEVICE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3, // origin
    },
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32, // size
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x3, // phase, speed, variation
    },
    wgpu::VertexAttribute {
        offset: 32,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32x3, // color
    },
];

/// Instance layout for [`SpriteInstance`].
pub fn host_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &HOST_ATTRIBUTES,
    }
}

/// Instance layout for [`ParticleAttributes`].
pub fn device_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ParticleAttributes>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &DEVICE_ATTRIBUTES,
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: FrameUniforms,
    num_particles: u32,
    mode: ExecutionMode,
    pub camera: Camera,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        store: &ParticleStore,
        profile: &FieldProfile,
        mode: ExecutionMode,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!(
            "Using adapter {:?} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let num_particles = store.len() as u32;
        let instance_buffer = match mode {
            ExecutionMode::Host => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Instance Buffer"),
                contents: bytemuck::cast_slice(HostBuffers::new(store).instances()),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            }),
            ExecutionMode::Device => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Attribute Buffer"),
                contents: bytemuck::cast_slice(&store.gpu_attributes()),
                usage: wgpu::BufferUsages::VERTEX,
            }),
        };

        let camera = Camera::new();
        let uniforms = FrameUniforms::new(
            camera.view_proj(aspect(&config)),
            Vec2::new(config.width as f32, config.height as f32),
            profile.point_scale,
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let (shader_src, vertex_layout) = match mode {
            ExecutionMode::Host => (shader::host_render_shader(), host_vertex_layout()),
            ExecutionMode::Device => (shader::device_render_shader(profile), device_vertex_layout()),
        };

        let render_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Field Render Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        // Sprites are translucent and never write depth
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &render_shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &render_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::info!(
            "Renderer ready: {} particles, {:?} mode, profile '{}', {}x{} {:?}",
            num_particles,
            mode,
            profile.name,
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            instance_buffer,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            num_particles,
            mode,
            camera,
        })
    }

    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Visible world size at the particle plane for the current surface.
    pub fn viewport_world(&self) -> Vec2 {
        self.camera.viewport_world_size(aspect(&self.config))
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            self.uniforms.view_proj = self.camera.view_proj(aspect(&self.config)).to_cols_array_2d();
            self.uniforms.viewport = [new_size.width as f32, new_size.height as f32];
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

            log::debug!("Surface resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Upload host-computed instances if they changed.
    ///
    /// No-op in device mode.
    pub fn upload_instances(&mut self, buffers: &mut HostBuffers) {
        if self.mode != ExecutionMode::Host {
            return;
        }
        if let Some(bytes) = buffers.take_dirty() {
            self.queue.write_buffer(&self.instance_buffer, 0, bytes);
        }
    }

    fn update_uniforms(&mut self, frame: &FrameInput) {
        if self.mode != ExecutionMode::Device {
            return;
        }
        self.uniforms.set_dynamics(frame.pointer, frame.time);
        self.queue.write_buffer(
            &self.uniform_buffer,
            FrameUniforms::DYNAMICS_OFFSET,
            bytemuck::bytes_of(&self.uniforms.dynamics()),
        );
    }

    pub fn render(&mut self, frame: &FrameInput) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(frame);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..self.num_particles);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn aspect(config: &wgpu::SurfaceConfiguration) -> f32 {
    config.width as f32 / config.height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_layout_offsets_match_struct() {
        let layout = host_vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 16, 28]);
    }

    #[test]
    fn test_device_layout_offsets_match_struct() {
        use std::mem::offset_of;

        let layout = device_vertex_layout();
        assert_eq!(layout.array_stride, 48);
        let attrs = layout.attributes;
        assert_eq!(attrs[0].offset as usize, offset_of!(ParticleAttributes, origin));
        assert_eq!(attrs[1].offset as usize, offset_of!(ParticleAttributes, size));
        assert_eq!(attrs[2].offset as usize, offset_of!(ParticleAttributes, random));
        assert_eq!(attrs[3].offset as usize, offset_of!(ParticleAttributes, color));
    }

    #[test]
    fn test_default_mode_is_device() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Device);
    }
}
