#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("raster is empty ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
    #[error("raster buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("renderer options: {0}")]
    Options(#[from] serde_json::Error),
}
