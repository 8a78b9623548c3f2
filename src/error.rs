use thiserror::Error;

/// Fatal startup failures. Everything after startup is infallible apart from
/// per-frame surface errors, which the renderer handles itself.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("no element matches selector `{0}`")]
    CanvasNotFound(String),
    #[error("element matched by `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("drawing surface has zero area")]
    ZeroSizedSurface,
    #[error("failed to create drawing surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to acquire GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to initialize {stage}: {message}")]
    Window { stage: &'static str, message: String },
    #[error("GPU is out of memory")]
    OutOfMemory,
}

pub type Result<T, E = StageError> = std::result::Result<T, E>;
