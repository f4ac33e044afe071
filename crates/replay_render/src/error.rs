use thiserror::Error;

/// Window or GPU failure. Always fatal to playback.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to create event loop: {0}")]
    EventLoop(String),

    #[error("failed to create window: {0}")]
    Window(String),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no graphics adapter can present to the window")]
    NoAdapter,

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,

    #[error("graphics device ran out of memory")]
    OutOfMemory,
}
