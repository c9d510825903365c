//! Crate-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the glint crate.
#[derive(Debug, Error)]
pub enum GlintError {
    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A shader source file could not be read.
    #[error("failed to read shader '{}': {source}", path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// WGSL validation rejected a shader module.
    #[error("shader '{label}' failed to compile:\n{message}")]
    ShaderCompile { label: String, message: String },

    /// An image file could not be opened or decoded.
    #[error("failed to load image '{}': {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The model importer rejected a file.
    #[error("failed to import model '{}': {source}", path.display())]
    ModelImport {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    /// A configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML configuration file could not be parsed.
    #[error("invalid config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The window surface could not be created.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no texture format it can present.
    #[error("surface supports no texture format")]
    NoSurfaceFormat,

    /// No adapter matched the surface.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to open a device.
    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Event loop creation or execution failed.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GlintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_read_error_names_the_file() {
        let err = GlintError::ShaderRead {
            path: PathBuf::from("assets/shaders/light.vert.wgsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = err.to_string();
        assert!(message.contains("assets/shaders/light.vert.wgsl"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GlintError = io.into();
        assert!(matches!(err, GlintError::Io(_)));
    }
}
