//! Error types for wavefield.
//!
//! Every error here is raised at startup: profile validation, particle store
//! construction, GPU initialization. Once a background is running the field
//! itself has no failure modes.

use std::fmt;

/// Invalid configuration detected before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The interaction ring needs a positive base radius.
    NonPositiveBaseRadius(f32),
    /// The reactive annulus needs a positive thickness.
    NonPositiveBorderThickness(f32),
    /// A field needs at least one particle.
    EmptyParticleCount,
    /// Smoothing factor must lie in (0, 1].
    InvalidSmoothing(f32),
    /// Transparency cap must lie in (0, 1].
    InvalidTransparencyCap(f32),
    /// A profile constant is NaN or infinite.
    NonFinite(&'static str),
    /// A constant that feeds size or alpha is negative.
    Negative(&'static str),
    /// A `[min, max)` range has `min > max` or negative extent.
    InvalidRange(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveBaseRadius(r) => {
                write!(f, "Base radius must be positive, got {}", r)
            }
            ConfigError::NonPositiveBorderThickness(t) => {
                write!(f, "Border thickness must be positive, got {}", t)
            }
            ConfigError::EmptyParticleCount => write!(f, "Particle count must be at least 1"),
            ConfigError::InvalidSmoothing(k) => {
                write!(f, "Smoothing factor must be in (0, 1], got {}", k)
            }
            ConfigError::InvalidTransparencyCap(c) => {
                write!(f, "Transparency cap must be in (0, 1], got {}", c)
            }
            ConfigError::NonFinite(name) => write!(f, "Profile constant `{}` is not finite", name),
            ConfigError::Negative(name) => write!(f, "Profile constant `{}` must not be negative", name),
            ConfigError::InvalidRange(name) => write!(f, "Range `{}` is inverted or negative", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    BufferMapping(String),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::BufferMapping(msg) => write!(f, "Failed to map GPU buffer: {}", msg),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when starting a background.
#[derive(Debug)]
pub enum BackgroundError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Profile or particle configuration rejected.
    Config(ConfigError),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            BackgroundError::Window(e) => write!(f, "Failed to create window: {}", e),
            BackgroundError::Gpu(e) => write!(f, "GPU error: {}", e),
            BackgroundError::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for BackgroundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackgroundError::EventLoop(e) => Some(e),
            BackgroundError::Window(e) => Some(e),
            BackgroundError::Gpu(e) => Some(e),
            BackgroundError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for BackgroundError {
    fn from(e: winit::error::EventLoopError) -> Self {
        BackgroundError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for BackgroundError {
    fn from(e: winit::error::OsError) -> Self {
        BackgroundError::Window(e)
    }
}

impl From<GpuError> for BackgroundError {
    fn from(e: GpuError) -> Self {
        BackgroundError::Gpu(e)
    }
}

impl From<ConfigError> for BackgroundError {
    fn from(e: ConfigError) -> Self {
        BackgroundError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let e = ConfigError::NonPositiveBaseRadius(0.0);
        assert!(e.to_string().contains("Base radius"));

        let e = ConfigError::NonFinite("wave_speed");
        assert!(e.to_string().contains("wave_speed"));
    }

    #[test]
    fn test_background_error_wraps_config() {
        let e: BackgroundError = ConfigError::EmptyParticleCount.into();
        assert!(matches!(e, BackgroundError::Config(ConfigError::EmptyParticleCount)));
        assert!(std::error::Error::source(&e).is_some());
    }
}
