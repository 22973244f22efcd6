use std::path::PathBuf;

/// Startup failures. Any of these aborts the program before the display loop.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
    #[error("no usable GPU device: {0}")]
    DeviceUnavailable(String),
    #[error("sand warp pipeline failed to build: {0}")]
    PipelineCompilation(String),
    #[error("failed to load texture {}: {reason}", path.display())]
    TextureLoad { path: PathBuf, reason: String },
}

/// Per-frame failures that cannot be recovered by skipping the frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("GPU ran out of memory while acquiring a frame")]
    OutOfMemory,
}
