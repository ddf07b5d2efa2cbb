//! Background builder and runner.

use std::sync::Arc;

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::BackgroundError;
use crate::field::FieldEvaluator;
use crate::frame::FrameLoop;
use crate::gpu::{ExecutionMode, GpuState};
use crate::host::HostBuffers;
use crate::input::Input;
use crate::profile::FieldProfile;
use crate::store::{DomainBounds, ParticleStore, SizeRange};

/// A decorative particle background.
///
/// Use method chaining to configure, then call `.run()` to start.
///
/// ```ignore
/// Background::new()
///     .with_profile(FieldProfile::drift())
///     .with_mode(ExecutionMode::Device)
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct Background {
    profile: FieldProfile,
    mode: ExecutionMode,
    /// Overrides the profile's particle count.
    particle_count: Option<u32>,
    bounds: DomainBounds,
    sizes: SizeRange,
    /// Overrides the profile's color.
    color: Option<Vec3>,
    seed: Option<u64>,
    title: String,
    window_size: (u32, u32),
}

impl Background {
    /// Create a background with default settings.
    pub fn new() -> Self {
        Self {
            profile: FieldProfile::default(),
            mode: ExecutionMode::default(),
            particle_count: None,
            bounds: DomainBounds::default(),
            sizes: SizeRange::default(),
            color: None,
            seed: None,
            title: "wavefield".to_string(),
            window_size: (1280, 720),
        }
    }

    pub fn with_profile(mut self, profile: FieldProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Choose where the field formula runs.
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use `count` particles instead of the profile's count.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = Some(count);
        self
    }

    /// Set the box particle origins are spread over.
    pub fn with_bounds(mut self, bounds: DomainBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.sizes = SizeRange { min, max };
        self
    }

    /// Set the particle color, overriding the profile's.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = Some(color);
        self
    }

    /// Fix the particle layout instead of seeding from entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    #[inline]
    pub fn profile(&self) -> &FieldProfile {
        &self.profile
    }

    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Particle count the store will be built with.
    pub fn particle_count(&self) -> u32 {
        self.particle_count.unwrap_or(self.profile.particle_count)
    }

    /// Particle color the store will be built with.
    pub fn color(&self) -> Vec3 {
        self.color.unwrap_or(self.profile.color)
    }

    /// Validate the configuration and build the particle store.
    ///
    /// Everything that can fail before a window exists fails here.
    pub fn build_store(&self) -> Result<ParticleStore, BackgroundError> {
        self.profile.validate()?;
        let (count, color) = (self.particle_count(), self.color());
        let store = match self.seed {
            Some(seed) => {
                ParticleStore::initialize_with_seed(count, self.bounds, self.sizes, color, seed)?
            }
            None => ParticleStore::initialize(count, self.bounds, self.sizes, color)?,
        };
        Ok(store)
    }

    /// Run the background. This blocks until the window is closed.
    pub fn run(self) -> Result<(), BackgroundError> {
        let store = self.build_store()?;

        log::info!(
            "Starting background: {} particles, profile '{}', {:?} mode",
            store.len(),
            self.profile.name,
            self.mode
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self, store);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    config: Background,
    store: ParticleStore,
    evaluator: FieldEvaluator,
    host_buffers: Option<HostBuffers>,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    frames: Option<FrameLoop>,
    input: Input,
    error: Option<BackgroundError>,
}

impl App {
    fn new(config: Background, store: ParticleStore) -> Self {
        let evaluator = FieldEvaluator::new(config.profile.clone());
        let host_buffers = match config.mode {
            ExecutionMode::Host => Some(HostBuffers::new(&store)),
            ExecutionMode::Device => None,
        };
        let (w, h) = config.window_size;

        Self {
            config,
            store,
            evaluator,
            host_buffers,
            window: None,
            gpu_state: None,
            frames: None,
            input: Input::new(w, h),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: BackgroundError) {
        log::error!("{}", error);
        self.error = Some(error);
        if let Some(frames) = &mut self.frames {
            frames.cancel();
        }
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackgroundError> {
        let (w, h) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(w, h));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            &self.store,
            &self.config.profile,
            self.config.mode,
        ))?;

        self.frames = Some(FrameLoop::new(&self.config.profile, gpu_state.viewport_world()));
        self.gpu_state = Some(gpu_state);
        window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu_state), Some(frames)) = (&mut self.gpu_state, &mut self.frames) else {
            return;
        };
        let Some(frame) = frames.tick(self.input.cursor_ndc()) else {
            return;
        };

        if let Some(buffers) = &mut self.host_buffers {
            buffers.evaluate_into(&self.evaluator, &self.store, frame.pointer, frame.time);
            gpu_state.upload_instances(buffers);
        }

        match gpu_state.render(&frame) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => gpu_state.resize(winit::dpi::PhysicalSize {
                width: gpu_state.config.width,
                height: gpu_state.config.height,
            }),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, shutting down");
                frames.cancel();
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                if let Some(frames) = &mut self.frames {
                    frames.cancel();
                }
                log::info!("Close requested, stopping frame loop");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                    if let Some(frames) = &mut self.frames {
                        frames.set_viewport_world(gpu_state.viewport_world());
                    }
                }
            }
            WindowEvent::Occluded(occluded) => {
                if let Some(frames) = &mut self.frames {
                    if occluded {
                        log::debug!("Window occluded, pausing");
                        frames.pause();
                    } else {
                        frames.resume();
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_builder_defaults() {
        let bg = Background::new();
        assert_eq!(bg.profile().name, "classic");
        assert_eq!(bg.mode(), ExecutionMode::Device);
        assert_eq!(bg.particle_count(), 2000);
        assert_eq!(bg.color(), Vec3::splat(0.2));
    }

    #[test]
    fn test_profile_sets_count_and_color() {
        let bg = Background::new().with_profile(FieldProfile::trefoil()).with_seed(3);
        assert_eq!(bg.particle_count(), 2500);

        let store = bg.build_store().unwrap();
        assert_eq!(store.len(), 2500);
        assert!(store
            .particles()
            .iter()
            .all(|p| p.color == Vec3::new(0.2, 0.25, 0.35)));
    }

    #[test]
    fn test_overrides_beat_profile() {
        // Overrides survive a later profile change
        let bg = Background::new()
            .with_particle_count(64)
            .with_color(Vec3::ONE)
            .with_profile(FieldProfile::trefoil());
        assert_eq!(bg.particle_count(), 64);
        assert_eq!(bg.color(), Vec3::ONE);
    }

    #[test]
    fn test_build_store_with_seed() {
        let bg = Background::new()
            .with_profile(FieldProfile::drift())
            .with_particle_count(64)
            .with_seed(5);
        let a = bg.build_store().unwrap();
        let b = bg.build_store().unwrap();
        assert_eq!(a.len(), 64);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_invalid_profile_rejected_before_window() {
        let bg = Background::new().with_profile(FieldProfile {
            base_radius: 0.0,
            ..FieldProfile::classic()
        });
        let err = bg.build_store().unwrap_err();
        assert!(matches!(
            err,
            BackgroundError::Config(ConfigError::NonPositiveBaseRadius(_))
        ));
    }

    #[test]
    fn test_zero_particles_rejected() {
        let err = Background::new().with_particle_count(0).build_store().unwrap_err();
        assert!(matches!(err, BackgroundError::Config(ConfigError::EmptyParticleCount)));
    }
}
